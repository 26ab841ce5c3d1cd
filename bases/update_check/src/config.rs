// bases/update_check/src/config.rs
use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use response_handler::DEFAULT_DEADLINE_FILE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use system_state::{RequestParams, DEFAULT_CMDLINE_PATH};
use update_types::{DevicePath, OmahaResponse};

pub const DEFAULT_PREFS_DIR: &str = "/var/lib/update_engine/prefs";

/// update-check configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Update check response to act on
    pub response_path: PathBuf,

    /// Device state overrides, if any
    pub state_path: Option<PathBuf>,

    pub prefs_dir: PathBuf,

    /// Boot device override, takes precedence over the state file
    pub boot_device: Option<DevicePath>,

    pub deadline_file: PathBuf,

    pub cmdline_path: PathBuf,

    pub force_unofficial: bool,
}

/// Decide what to install from an update check response
///
/// Prints the resulting install plan as JSON on stdout. Logs go to stderr.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// JSON update check response
    #[arg(long)]
    pub response: PathBuf,

    /// JSON device state (official build, boot device, request parameters)
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Directory holding persisted update progress
    #[arg(long, default_value = DEFAULT_PREFS_DIR)]
    pub prefs_dir: PathBuf,

    /// Install relative to this boot device instead of the running one
    #[arg(long)]
    pub boot_device: Option<String>,

    /// Where to write the response deadline for the UI
    #[arg(long, default_value = DEFAULT_DEADLINE_FILE)]
    pub deadline_file: PathBuf,

    /// Kernel command line used to find the boot device
    #[arg(long, default_value = DEFAULT_CMDLINE_PATH)]
    pub cmdline: PathBuf,

    /// Treat the build as unofficial regardless of the state file
    #[arg(long)]
    pub unofficial: bool,
}

impl Config {
    /// Create configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Self {
        let boot_device = args
            .boot_device
            .filter(|d| !d.trim().is_empty())
            .map(DevicePath::new);

        Self {
            response_path: args.response,
            state_path: args.state,
            prefs_dir: args.prefs_dir,
            boot_device,
            deadline_file: args.deadline_file,
            cmdline_path: args.cmdline,
            force_unofficial: args.unofficial,
        }
    }

    pub fn load_response(&self) -> Result<OmahaResponse> {
        load_json(&self.response_path, "update check response")
    }

    /// Device state from the state file, or defaults when none was given
    pub fn load_device_state(&self) -> Result<DeviceState> {
        let mut state: DeviceState = match &self.state_path {
            Some(path) => load_json(path, "device state")?,
            None => DeviceState::default(),
        };
        if self.force_unofficial {
            state.official_build = false;
        }
        if self.boot_device.is_some() {
            state.boot_device = self.boot_device.clone();
        }
        Ok(state)
    }
}

/// What the device knows about itself at update check time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceState {
    pub official_build: bool,
    pub boot_device: Option<DevicePath>,
    pub request_params: RequestParams,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            official_build: true,
            boot_device: None,
            request_params: RequestParams::default(),
        }
    }
}

fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let raw = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read {} from {}", what, path.display()))?;
    serde_json::from_str(&raw)
        .wrap_err_with(|| format!("Failed to parse {} in {}", what, path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(response: &str) -> CliArgs {
        CliArgs::parse_from(["update-check", "--response", response])
    }

    fn json_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_point_at_system_locations() {
        let config = Config::from_args(args("response.json"));

        assert_eq!(config.response_path, PathBuf::from("response.json"));
        assert_eq!(config.state_path, None);
        assert_eq!(config.prefs_dir, PathBuf::from(DEFAULT_PREFS_DIR));
        assert_eq!(config.deadline_file, PathBuf::from(DEFAULT_DEADLINE_FILE));
        assert_eq!(config.cmdline_path, PathBuf::from("/proc/cmdline"));
        assert_eq!(config.boot_device, None);
        assert!(!config.force_unofficial);
    }

    #[test]
    fn overrides_from_flags() {
        let args = CliArgs::parse_from([
            "update-check",
            "--response",
            "r.json",
            "--state",
            "s.json",
            "--prefs-dir",
            "/tmp/prefs",
            "--boot-device",
            "/dev/sdb3",
            "--deadline-file",
            "/tmp/deadline",
            "--cmdline",
            "/tmp/cmdline",
            "--unofficial",
        ]);
        let config = Config::from_args(args);

        assert_eq!(config.state_path, Some(PathBuf::from("s.json")));
        assert_eq!(config.prefs_dir, PathBuf::from("/tmp/prefs"));
        assert_eq!(config.boot_device, Some(DevicePath::new("/dev/sdb3")));
        assert_eq!(config.deadline_file, PathBuf::from("/tmp/deadline"));
        assert_eq!(config.cmdline_path, PathBuf::from("/tmp/cmdline"));
        assert!(config.force_unofficial);
    }

    #[test]
    fn blank_boot_device_is_no_override() {
        let mut args = args("r.json");
        args.boot_device = Some("  ".to_string());
        assert_eq!(Config::from_args(args).boot_device, None);
    }

    #[test]
    fn missing_state_file_means_defaults() {
        let config = Config::from_args(args("r.json"));
        let state = config.load_device_state().unwrap();

        assert!(state.official_build);
        assert_eq!(state.boot_device, None);
        assert_eq!(state.request_params, RequestParams::default());
    }

    #[test]
    fn state_file_is_partial() {
        let file = json_file(r#"{"request_params": {"use_p2p_for_downloading": true}}"#);
        let mut config = Config::from_args(args("r.json"));
        config.state_path = Some(file.path().to_path_buf());

        let state = config.load_device_state().unwrap();
        assert!(state.official_build);
        assert!(state.request_params.use_p2p_for_downloading);
        assert_eq!(state.request_params.p2p_url, "");
    }

    #[rstest]
    #[case::state_file_only(false, None, true, Some("/dev/sda3"))]
    #[case::unofficial_flag(true, None, false, Some("/dev/sda3"))]
    #[case::boot_device_flag(false, Some("/dev/sda5"), true, Some("/dev/sda5"))]
    #[case::both_flags(true, Some("/dev/sda5"), false, Some("/dev/sda5"))]
    fn flags_override_state_file(
        #[case] force_unofficial: bool,
        #[case] boot_device: Option<&str>,
        #[case] official_build: bool,
        #[case] expected_boot_device: Option<&str>,
    ) {
        let file = json_file(r#"{"official_build": true, "boot_device": "/dev/sda3"}"#);
        let mut config = Config::from_args(args("r.json"));
        config.state_path = Some(file.path().to_path_buf());
        config.boot_device = boot_device.map(DevicePath::new);
        config.force_unofficial = force_unofficial;

        let state = config.load_device_state().unwrap();
        assert_eq!(state.official_build, official_build);
        assert_eq!(state.boot_device, expected_boot_device.map(DevicePath::new));
    }

    #[test]
    fn loads_response() {
        let file = json_file(
            r#"{"update_exists": true, "version": "1.2.3", "payload_urls": ["https://a"], "deadline": "D1"}"#,
        );
        let config = Config::from_args(args(file.path().to_str().unwrap()));

        let response = config.load_response().unwrap();
        assert!(response.update_exists);
        assert_eq!(response.version, "1.2.3");
        assert_eq!(response.deadline, b"D1".to_vec());
    }

    #[test]
    fn unreadable_or_malformed_files_carry_context() {
        let config = Config::from_args(args("/nonexistent/response.json"));
        let err = config.load_response().unwrap_err();
        assert!(err.to_string().contains("Failed to read update check response"));

        let file = json_file("{ not json");
        let config = Config::from_args(args(file.path().to_str().unwrap()));
        let err = config.load_response().unwrap_err();
        assert!(err.to_string().contains("Failed to parse update check response"));
    }
}
