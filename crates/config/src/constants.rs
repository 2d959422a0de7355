//! Fixed defaults that are not worth a configuration knob

/// Providers catalog published by the snapshot maintainers
pub const DEFAULT_CATALOG_URL: &str =
    "https://raw.githubusercontent.com/21state/celestia-snapshots/refs/heads/main/providers.yaml";

/// Chain id used when none is given on the command line
pub const DEFAULT_CHAIN_ID: &str = "celestia";

/// Directory created under `$HOME` when no download directory is configured
pub const DEFAULT_DOWNLOAD_DIR_NAME: &str = "celestia-snapshots";

/// Name of the directory under the system config dir holding `config.toml`
pub const CONFIG_DIR_NAME: &str = "snapfind";

/// Subdirectory of the cache dir holding debug logs
pub const LOG_DIR_NAME: &str = "logs";

/// Upper bound for the health timeout and the speed test window, in seconds
pub const MAX_PROBE_SECS: u64 = 3600;
