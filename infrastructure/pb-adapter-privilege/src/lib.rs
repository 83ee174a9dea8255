//! 権限確認アダプター
//!
//! HKLM への書き込みには昇格済みプロセスが必要。コアは権限を意識せず、
//! 起動時にここで一度だけ確認する。

/// 現在のプロセスが昇格済み（管理者権限）か確認
pub fn is_elevated() -> bool {
    #[cfg(target_os = "windows")]
    {
        windows_admin::check_admin()
    }
    #[cfg(not(target_os = "windows"))]
    {
        false
    }
}

#[cfg(target_os = "windows")]
mod windows_admin {
    use windows::Win32::Foundation::{CloseHandle, HANDLE};
    use windows::Win32::Security::{
        GetTokenInformation, TOKEN_ELEVATION, TOKEN_QUERY, TokenElevation,
    };
    use windows::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

    // トークンハンドルはスコープを抜けると必ず閉じる
    struct TokenGuard(HANDLE);

    impl Drop for TokenGuard {
        fn drop(&mut self) {
            unsafe {
                let _ = CloseHandle(self.0);
            }
        }
    }

    pub fn check_admin() -> bool {
        unsafe {
            let mut token = HANDLE::default();
            if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token).is_err() {
                return false;
            }
            let token = TokenGuard(token);

            let mut elevation = TOKEN_ELEVATION::default();
            let mut return_length = 0u32;
            let result = GetTokenInformation(
                token.0,
                TokenElevation,
                Some(&mut elevation as *mut _ as *mut _),
                std::mem::size_of::<TOKEN_ELEVATION>() as u32,
                &mut return_length,
            );
            result.is_ok() && elevation.TokenIsElevated != 0
        }
    }
}

#[cfg(all(test, not(target_os = "windows")))]
mod tests {
    use super::*;

    #[test]
    fn non_windows_is_never_elevated() {
        assert!(!is_elevated());
    }
}
