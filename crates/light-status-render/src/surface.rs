use anyhow::Result;
use light_status_geometry::Rect;

/// 面板的绘制原语
///
/// 一帧的调用顺序固定为：`clear` → `fill_background` → `measure_text`
/// → `draw_text` → `flush`，`flush` 之前的内容对用户不可见。
pub trait Surface {
    /// 清空窗口内容
    fn clear(&mut self) -> Result<()>;

    /// 用背景色填满整个面板
    fn fill_background(&mut self);

    /// 测量文本尺寸 (宽, 高)，单位像素
    fn measure_text(&mut self, text: &str) -> (i32, i32);

    /// 在面板内的 `rect` 处绘制文本
    fn draw_text(&mut self, text: &str, rect: Rect);

    /// 把缓冲区提交到屏幕
    fn flush(&mut self) -> Result<()>;
}
