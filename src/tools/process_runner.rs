use crate::component::preview_generator::PipelineObserver;
use crate::error::{PreviewError, PreviewResult};
use log::debug;
use std::ffi::OsString;
use std::fmt;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

/// 要執行的命令列
///
/// 兩種形式：直接執行檔加參數，或交給系統 shell 解譯的整行字串
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
    Direct { program: String, args: Vec<OsString> },
    Shell(String),
}

impl CommandLine {
    pub fn direct(program: impl Into<String>) -> Self {
        Self::Direct {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn shell(script: impl Into<String>) -> Self {
        Self::Shell(script.into())
    }

    /// 加入一個參數（shell 形式則以空白附加）
    #[must_use]
    pub fn arg(mut self, value: impl Into<OsString>) -> Self {
        match &mut self {
            Self::Direct { args, .. } => args.push(value.into()),
            Self::Shell(script) => {
                script.push(' ');
                script.push_str(&value.into().to_string_lossy());
            }
        }
        self
    }

    #[must_use]
    pub fn args<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        values.into_iter().fold(self, |cmd, value| cmd.arg(value))
    }

    #[must_use]
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.as_os_str())
    }

    /// 執行的程式名稱；shell 形式回傳整行的第一個字
    #[must_use]
    pub fn program(&self) -> &str {
        match self {
            Self::Direct { program, .. } => program,
            Self::Shell(script) => script.split_whitespace().next().unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn arguments(&self) -> &[OsString] {
        match self {
            Self::Direct { args, .. } => args,
            Self::Shell(_) => &[],
        }
    }

    fn to_command(&self) -> Command {
        match self {
            Self::Direct { program, args } => {
                let mut cmd = Command::new(program);
                cmd.args(args);
                cmd
            }
            Self::Shell(script) => {
                let mut cmd = if cfg!(windows) {
                    let mut cmd = Command::new("cmd.exe");
                    cmd.arg("/C");
                    cmd
                } else {
                    let mut cmd = Command::new("/bin/sh");
                    cmd.arg("-c");
                    cmd
                };
                cmd.arg(script);
                cmd
            }
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct { program, args } => {
                f.write_str(program)?;
                for arg in args {
                    write!(f, " {}", arg.to_string_lossy())?;
                }
                Ok(())
            }
            Self::Shell(script) => f.write_str(script),
        }
    }
}

/// 子程序的輸出
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    #[must_use]
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    #[must_use]
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// 非零結束碼或 stderr 有內容都視為失敗
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0) && self.stderr.trim().is_empty()
    }

    pub fn into_result(self, command: &CommandLine) -> PreviewResult<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let stderr = match (self.stderr.trim(), self.exit_code) {
            ("", Some(code)) => format!("exited with status {code}"),
            ("", None) => "terminated by signal".to_string(),
            (text, _) => text.to_string(),
        };

        Err(PreviewError::SubprocessFailure {
            command: command.program().to_string(),
            stderr,
        })
    }
}

/// 子程序閘道；測試時可替換為不啟動真實工具的實作
pub trait ProcessRunner: Send + Sync {
    /// 執行命令並同步取回輸出
    ///
    /// 找不到執行檔時回傳 [`PreviewError::ToolMissing`]；
    /// 結束碼與 stderr 原樣放在 [`ProcessOutput`]，由呼叫端決定是否視為失敗
    fn run(&self, command: &CommandLine) -> PreviewResult<ProcessOutput>;
}

/// 使用 `std::process::Command` 啟動真實子程序
pub struct SystemProcessRunner {
    observer: Arc<dyn PipelineObserver>,
}

impl SystemProcessRunner {
    #[must_use]
    pub fn new(observer: Arc<dyn PipelineObserver>) -> Self {
        Self { observer }
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, command: &CommandLine) -> PreviewResult<ProcessOutput> {
        self.observer.command_started(command);

        let output = command.to_command().output().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                PreviewError::ToolMissing {
                    tool: command.program().to_string(),
                }
            } else {
                PreviewError::io(format!("cannot spawn `{}`", command.program()), e)
            }
        })?;

        let output = ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        debug!(
            "`{}` exited with {:?} ({} bytes stdout, {} bytes stderr)",
            command.program(),
            output.exit_code,
            output.stdout.len(),
            output.stderr.len()
        );
        self.observer.command_finished(command, &output);

        Ok(output)
    }
}
