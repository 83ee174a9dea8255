//! キー値ストアポート
//!
//! OSの構成データベース（レジストリ）または同等の永続ファイルを抽象化する。
//! ハンドルは1回の操作の間だけ保持し、Drop で必ず解放する。

use crate::error::StorageAccessError;
use crate::model::{Namespace, StoredValue, ValueData};

pub trait KeyValueStore {
    /// 名前空間を開く
    ///
    /// 存在しない場合、`create` が真なら作成し、偽なら `Ok(None)` を返す。
    fn open(
        &self,
        namespace: &Namespace,
        create: bool,
    ) -> Result<Option<Box<dyn NamespaceHandle + '_>>, StorageAccessError>;
}

/// 開いた名前空間へのハンドル
pub trait NamespaceHandle {
    /// 全値を列挙（順序は不定）
    fn enumerate(&self) -> Result<Vec<StoredValue>, StorageAccessError>;

    /// 値を1件取得
    fn get(&self, name: &str) -> Result<Option<ValueData>, StorageAccessError>;

    /// 文字列値を書き込む（既存値は上書き）
    fn set_text(&mut self, name: &str, value: &str) -> Result<(), StorageAccessError>;

    /// 値を削除。存在しなかった場合は `Ok(false)`
    fn delete(&mut self, name: &str) -> Result<bool, StorageAccessError>;
}
