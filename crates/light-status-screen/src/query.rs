use anyhow::Result;
use light_status_geometry::Rect;

/// 窗口系统提供的一次性查询能力
///
/// 只在启动时调用；失败不是致命错误，由解析流程降级处理。
pub trait DisplayQuery {
    /// 多显示器拓扑，按窗口系统报告的顺序
    fn monitors(&self) -> Result<Vec<Rect>>;

    /// 指针在屏幕空间中的绝对坐标
    fn pointer(&self) -> Result<(i32, i32)>;

    /// 默认屏幕序号，鼠标不在任何显示器上时使用
    fn default_screen(&self) -> usize;

    /// 默认屏幕的尺寸 (宽, 高)
    fn default_screen_size(&self) -> (i32, i32);
}
