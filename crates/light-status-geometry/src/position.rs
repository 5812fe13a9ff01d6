use std::str::FromStr;

use tracing::warn;

use crate::error::ParseError;
use crate::rect::Rect;

/// 鼠标坐标的参照点
///
/// 数字编码沿用命令行写法：第一位是横向是否居中，第二位是纵向是否居中。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// `-1`：已经是绝对坐标
    Absolute,
    /// `00`：相对左上角
    TopLeft,
    /// `10`：横向居中，纵向从顶部
    TopCenter,
    /// `01`：横向从左侧，纵向居中
    MiddleLeft,
    /// `11`：两个方向都居中
    Center,
}

impl Anchor {
    /// 未知编码按绝对坐标处理
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Anchor::Absolute),
            0 => Some(Anchor::TopLeft),
            10 => Some(Anchor::TopCenter),
            1 => Some(Anchor::MiddleLeft),
            11 => Some(Anchor::Center),
            _ => None,
        }
    }
}

/// 手动指定的鼠标位置，用于无法查询指针的环境（如 Wayland 下的 XWayland）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MousePosition {
    pub x: i32,
    pub y: i32,
    pub anchor: Anchor,
}

impl MousePosition {
    /// 以 `reference` 为参照换算成绝对坐标
    ///
    /// 纵向居中时 y 取反（向上为正），横向保持向右为正。
    pub fn to_absolute(&self, reference: &Rect) -> (i32, i32) {
        let Rect { x, y, w, h } = *reference;
        match self.anchor {
            Anchor::Absolute => (self.x, self.y),
            Anchor::TopLeft => (x + self.x, y + self.y),
            Anchor::TopCenter => (x + w / 2 + self.x, y + self.y),
            Anchor::MiddleLeft => (x + self.x, y + h / 2 - self.y),
            Anchor::Center => (x + w / 2 + self.x, y + h / 2 - self.y),
        }
    }
}

impl FromStr for MousePosition {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::MousePosition(s.to_string());
        let fields = s
            .split(':')
            .map(|field| field.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| err())?;
        let [x, y, code] = fields[..] else {
            return Err(err());
        };
        let anchor = Anchor::from_code(code).unwrap_or_else(|| {
            warn!(code, "unknown mouse position center, treating position as absolute");
            Anchor::Absolute
        });
        Ok(Self { x, y, anchor })
    }
}
