use std::convert::Infallible;
use std::str::FromStr;

use crate::number::leading_int;
use crate::rect::Rect;

/// 单条边的对齐方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    /// 未设置
    #[default]
    Unset,
    /// 居中，优先于同轴上的任何偏移
    Center,
    /// 距该边的像素偏移
    Offset(i32),
}

impl FromStr for Align {
    type Err = Infallible;

    /// `C` 居中，`U` 未设置，其余取开头的整数作为偏移（无数字时为 0）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.chars().next() {
            Some('C') => Align::Center,
            Some('U') => Align::Unset,
            _ => Align::Offset(leading_int(s)),
        })
    }
}

/// 对齐意图：上下决定纵轴，左右决定横轴
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Alignment {
    pub top: Align,
    pub bottom: Align,
    pub left: Align,
    pub right: Align,
}

impl Alignment {
    pub const fn centered() -> Self {
        Self {
            top: Align::Center,
            bottom: Align::Unset,
            left: Align::Center,
            right: Align::Unset,
        }
    }

    /// 计算 `object` 在 `container` 内的位置，只改写 `object` 的 x、y
    pub fn resolve(&self, object: &mut Rect, container: &Rect) {
        object.y = resolve_axis(self.top, self.bottom, object.h, container.h);
        object.x = resolve_axis(self.left, self.right, object.w, container.w);
    }
}

fn resolve_axis(near: Align, far: Align, size: i32, extent: i32) -> i32 {
    match (near, far) {
        (Align::Center, _) | (_, Align::Center) => (extent - size) / 2,
        (Align::Offset(offset), _) => offset,
        (Align::Unset, Align::Offset(offset)) => extent - size - offset,
        (Align::Unset, Align::Unset) => 0,
    }
}
