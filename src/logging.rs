//! 파일 + 콘솔 로깅 초기화.

use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// tracing 구독자를 콘솔과 파일 두 출력으로 초기화합니다.
///
/// 전역 구독자는 프로세스당 한 번만 설정할 수 있으므로 `try_init`을
/// 사용합니다. 이미 초기화된 상태에서 다시 호출해도 출력 대상이
/// 중복으로 붙지 않고 조용히 넘어갑니다.
///
/// `RUST_LOG`가 설정되어 있으면 `level` 인자보다 우선합니다.
pub fn init(level: &str, log_file: &Path) -> io::Result<()> {
    if let Some(dir) = log_file.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    let file = File::options().create(true).append(true).open(log_file)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("quote_collector={level}").into());

    let console_layer = tracing_subscriber::fmt::layer();
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        let dir = tempfile::tempdir().expect("임시 디렉터리 생성 실패");
        let path = dir.path().join("logs").join("test.log");

        // 두 번째 호출은 no-op이어야 함 (중복 출력 없음)
        init("debug", &path).expect("첫 초기화 실패");
        init("debug", &path).expect("재초기화가 실패하면 안 됨");

        assert!(path.exists());
    }
}
