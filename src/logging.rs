//! ログ初期化
//!
//! RUST_LOG があればそれを優先し、なければ -v の有無で既定レベルを決める

use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let default_level = if verbose {
        "scanverify=debug,scanverify_common=debug"
    } else {
        "scanverify=info,scanverify_common=warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // 二重初期化（テストなど）は無視
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
