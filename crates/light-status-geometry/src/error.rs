use thiserror::Error;

/// 配置迷你语言的解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("wrong mouse position format `{0}`, expected <x:y:center>")]
    MousePosition(String),

    #[error("wrong monitor spec `{spec}`: {reason}, expected <name:index:width:height:x:y>")]
    MonitorSpec { spec: String, reason: &'static str },
}
