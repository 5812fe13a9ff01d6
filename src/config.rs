use light_status_geometry::{Align, Alignment, MonitorSelection, MonitorSpec, MousePosition, Rect};
use light_status_render::{Color, FontFamily, FontSpec};

use crate::cli::{Cli, MonitorList};

const MAX_STATUS_LEN: usize = 2048;
const PANEL_WIDTH: i32 = 1000;
const PANEL_HEIGHT: i32 = 70;
const FONT_POINTS: f32 = 20.0;
const COMMAND: &str = "/usr/local/bin/slstatus -s";
const WINDOW_NAME: &str = "light-status";
const WINDOW_CLASS: &str = "LightStatus";
/// 有显示器声明且选择 `F` 时使用的声明序号
const DEFAULT_MONITOR_INDEX: i32 = 0;

/// 运行期配置，启动后不再修改
#[derive(Debug, Clone)]
pub struct Config {
    pub command: String,
    pub max_status_len: usize,
    pub panel_width: i32,
    pub panel_height: i32,
    pub panel_alignment: Alignment,
    pub text_alignment: Alignment,
    /// 按优先级排列，至少一项
    pub fonts: Vec<FontSpec>,
    pub text_color: Color,
    pub background: Color,
    pub window_name: String,
    pub window_class: String,
    pub monitor: MonitorSelection,
    pub default_monitor_index: i32,
    pub mouse: Option<MousePosition>,
    pub monitors: Vec<MonitorSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command: COMMAND.to_string(),
            max_status_len: MAX_STATUS_LEN,
            panel_width: PANEL_WIDTH,
            panel_height: PANEL_HEIGHT,
            panel_alignment: Alignment::centered(),
            text_alignment: Alignment {
                top: Align::Unset,
                bottom: Align::Center,
                left: Align::Unset,
                right: Align::Center,
            },
            fonts: vec![FontSpec::from_points(FontFamily::Monospace, FONT_POINTS)],
            text_color: Color::WHITE,
            background: Color::BLACK,
            window_name: WINDOW_NAME.to_string(),
            window_class: WINDOW_CLASS.to_string(),
            monitor: MonitorSelection::Focused,
            default_monitor_index: DEFAULT_MONITOR_INDEX,
            mouse: None,
            monitors: Vec::new(),
        }
    }
}

impl Config {
    /// 命令行参数逐项覆盖默认值
    pub fn from_cli(cli: Cli) -> Self {
        let defaults = Self::default();

        let panel = defaults.panel_alignment;
        let text = defaults.text_alignment;

        Self {
            command: cli.command.unwrap_or(defaults.command),
            max_status_len: cli.max_status_len.unwrap_or(defaults.max_status_len),
            panel_width: cli.width.unwrap_or(defaults.panel_width),
            panel_height: cli.height.unwrap_or(defaults.panel_height),
            panel_alignment: Alignment {
                top: cli.top.unwrap_or(panel.top),
                bottom: cli.bottom.unwrap_or(panel.bottom),
                left: cli.left.unwrap_or(panel.left),
                right: cli.right.unwrap_or(panel.right),
            },
            text_alignment: Alignment {
                top: cli.text_top.unwrap_or(text.top),
                bottom: cli.text_bottom.unwrap_or(text.bottom),
                left: cli.text_left.unwrap_or(text.left),
                right: cli.text_right.unwrap_or(text.right),
            },
            fonts: if cli.fonts.is_empty() {
                defaults.fonts
            } else {
                cli.fonts
            },
            text_color: cli.text_color.unwrap_or(defaults.text_color),
            background: cli.background.unwrap_or(defaults.background),
            window_name: cli.window_name.unwrap_or(defaults.window_name),
            window_class: cli.window_class.unwrap_or(defaults.window_class),
            monitor: cli.monitor.unwrap_or(defaults.monitor),
            default_monitor_index: defaults.default_monitor_index,
            mouse: cli.mouse,
            monitors: cli
                .monitors
                .map(|MonitorList(specs)| specs)
                .unwrap_or(defaults.monitors),
        }
    }

    /// 面板在屏幕空间中的位置：先在区域内对齐，再平移到区域原点
    pub fn panel_rect(&self, region: &Rect) -> Rect {
        let mut panel = Rect::sized(self.panel_width, self.panel_height);
        self.panel_alignment
            .resolve(&mut panel, &Rect::sized(region.w, region.h));
        panel.offset(region.x, region.y)
    }
}
