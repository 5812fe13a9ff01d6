use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use rustix::process::{kill_process_group, Pid, Signal};
use tokio::io::BufReader;
use tokio::process::{Child, ChildStdout, Command};
use tracing::{debug, info, warn};

/// SIGTERM 之后等待子进程退出的时间
const TERM_GRACE: Duration = Duration::from_millis(500);

/// 状态数据生产者：通过 `sh -c` 启动的子进程
///
/// 子进程是新进程组的组长，管道里的其他命令也在这个组中。
/// drop 时只有 `sh` 会被杀掉；正常退出路径应调用 [`Producer::shutdown`] 结束整个组。
pub struct Producer {
    child: Child,
    group: Option<Pid>,
    stdout: BufReader<ChildStdout>,
}

impl Producer {
    pub fn spawn(command: &str) -> Result<Self> {
        info!(%command, "starting status producer");

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .process_group(0)
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to run the command `{command}`"))?;

        let group = child
            .id()
            .and_then(|id| i32::try_from(id).ok())
            .and_then(Pid::from_raw);
        let stdout = child
            .stdout
            .take()
            .context("producer stdout was not captured")?;

        Ok(Self {
            child,
            group,
            stdout: BufReader::new(stdout),
        })
    }

    /// 行输出流
    pub fn stdout(&mut self) -> &mut BufReader<ChildStdout> {
        &mut self.stdout
    }

    /// 向整个进程组发送 SIGTERM，超时后强制结束 `sh`
    pub async fn shutdown(mut self) {
        if let Some(group) = self.group {
            match kill_process_group(group, Signal::TERM) {
                Ok(()) => debug!(pgid = group.as_raw_nonzero().get(), "producer group terminated"),
                Err(e) => debug!("producer group already gone: {e}"),
            }
        }

        match tokio::time::timeout(TERM_GRACE, self.child.wait()).await {
            Ok(Ok(status)) => {
                debug!(%status, "producer exited");
                return;
            }
            Ok(Err(e)) => warn!("failed to wait for producer: {e}"),
            Err(_) => debug!("producer ignored SIGTERM"),
        }

        if let Err(e) = self.child.kill().await {
            warn!("failed to stop producer: {e}");
        } else {
            debug!("producer killed");
        }
    }
}
