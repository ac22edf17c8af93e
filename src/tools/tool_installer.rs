use crate::error::{PreviewError, PreviewResult};
use crate::tools::process_runner::{CommandLine, ProcessRunner};
use log::{info, warn};

/// 主機平台；各自產生套件管理器的安裝指令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
    Unsupported,
}

impl Platform {
    #[must_use]
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Self::Windows,
            "linux" => Self::Linux,
            "macos" => Self::MacOs,
            _ => Self::Unsupported,
        }
    }

    /// 安裝指令
    ///
    /// Windows 需要 Chocolatey，Linux 需要 apt-get 與 sudo 權限，macOS 需要 Homebrew
    #[must_use]
    pub fn install_command(self, package: &str) -> Option<CommandLine> {
        let script = match self {
            Self::Windows => format!("choco install -y {package}"),
            Self::Linux => {
                format!("sudo apt-get update && sudo apt-get install -y {package}")
            }
            Self::MacOs => format!("brew install {package}"),
            Self::Unsupported => return None,
        };
        Some(CommandLine::shell(script))
    }
}

/// 確認外部工具存在，必要時透過套件管理器安裝
#[derive(Debug, Clone)]
pub struct ToolInstaller {
    tool: String,
    package: String,
    validation: CommandLine,
    platform: Platform,
}

impl ToolInstaller {
    /// `tool` 為執行檔名稱，以 `<tool> -version` 驗證是否可用
    pub fn new(tool: impl Into<String>, package: impl Into<String>) -> Self {
        let tool = tool.into();
        let validation = CommandLine::direct(tool.clone()).arg("-version");
        Self {
            tool,
            package: package.into(),
            validation,
            platform: Platform::current(),
        }
    }

    #[must_use]
    pub const fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    #[must_use]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    pub fn is_installed(&self, runner: &dyn ProcessRunner) -> PreviewResult<bool> {
        match runner.run(&self.validation) {
            Ok(output) => Ok(output.exit_code == Some(0)),
            Err(PreviewError::ToolMissing { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// 已安裝時不做任何事；安裝失敗或安裝後仍無法執行則回傳 [`PreviewError::ToolMissing`]
    pub fn ensure_installed(&self, runner: &dyn ProcessRunner) -> PreviewResult<()> {
        if self.is_installed(runner)? {
            return Ok(());
        }

        let missing = || PreviewError::ToolMissing {
            tool: self.tool.clone(),
        };

        let Some(install) = self.platform.install_command(&self.package) else {
            warn!("不支援的平台，無法自動安裝 {}", self.package);
            return Err(missing());
        };

        info!("安裝 {}: {install}", self.package);
        let output = runner.run(&install).map_err(|e| {
            warn!("安裝 {} 失敗: {e}", self.package);
            missing()
        })?;
        if output.exit_code != Some(0) {
            warn!("安裝 {} 失敗: {}", self.package, output.stderr.trim());
            return Err(missing());
        }

        if self.is_installed(runner)? {
            Ok(())
        } else {
            Err(missing())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::process_runner::ProcessOutput;
    use std::sync::Mutex;

    struct ScriptedRunner {
        installed: Mutex<bool>,
        install_succeeds: bool,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedRunner {
        fn new(installed: bool, install_succeeds: bool) -> Self {
            Self {
                installed: Mutex::new(installed),
                install_succeeds,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl ProcessRunner for ScriptedRunner {
        fn run(&self, command: &CommandLine) -> PreviewResult<ProcessOutput> {
            self.calls.lock().unwrap().push(command.to_string());
            match command {
                CommandLine::Shell(_) => {
                    if self.install_succeeds {
                        *self.installed.lock().unwrap() = true;
                        Ok(ProcessOutput::success(""))
                    } else {
                        Ok(ProcessOutput::failure(100, "E: Unable to locate package"))
                    }
                }
                CommandLine::Direct { program, .. } => {
                    if *self.installed.lock().unwrap() {
                        Ok(ProcessOutput::success("version 6.1"))
                    } else {
                        Err(PreviewError::ToolMissing {
                            tool: program.clone(),
                        })
                    }
                }
            }
        }
    }

    #[test]
    fn test_install_commands_per_platform() {
        assert_eq!(
            Platform::Linux.install_command("ffmpeg").unwrap().to_string(),
            "sudo apt-get update && sudo apt-get install -y ffmpeg"
        );
        assert_eq!(
            Platform::MacOs.install_command("imagemagick").unwrap().to_string(),
            "brew install imagemagick"
        );
        assert_eq!(
            Platform::Windows.install_command("ffmpeg").unwrap().to_string(),
            "choco install -y ffmpeg"
        );
        assert!(Platform::Unsupported.install_command("ffmpeg").is_none());
    }

    #[test]
    fn test_already_installed_skips_install() {
        let runner = ScriptedRunner::new(true, false);
        let installer = ToolInstaller::new("ffmpeg", "ffmpeg").with_platform(Platform::Linux);
        installer.ensure_installed(&runner).unwrap();
        assert_eq!(*runner.calls.lock().unwrap(), vec!["ffmpeg -version"]);
    }

    #[test]
    fn test_installs_missing_tool() {
        let runner = ScriptedRunner::new(false, true);
        let installer = ToolInstaller::new("montage", "imagemagick").with_platform(Platform::MacOs);
        installer.ensure_installed(&runner).unwrap();
        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1], "brew install imagemagick");
    }

    #[test]
    fn test_failed_install_is_tool_missing() {
        let runner = ScriptedRunner::new(false, false);
        let installer = ToolInstaller::new("ffmpeg", "ffmpeg").with_platform(Platform::Linux);
        match installer.ensure_installed(&runner) {
            Err(PreviewError::ToolMissing { tool }) => assert_eq!(tool, "ffmpeg"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_platform_is_tool_missing() {
        let runner = ScriptedRunner::new(false, true);
        let installer =
            ToolInstaller::new("ffmpeg", "ffmpeg").with_platform(Platform::Unsupported);
        assert!(matches!(
            installer.ensure_installed(&runner),
            Err(PreviewError::ToolMissing { .. })
        ));
        assert_eq!(runner.calls.lock().unwrap().len(), 1);
    }
}
