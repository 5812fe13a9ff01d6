use std::ffi::OsString;
use std::str::FromStr;

use clap::error::ErrorKind;
use clap::{value_parser, ArgAction, Parser};
use light_status_geometry::{Align, MonitorSelection, MonitorSpec, MousePosition, ParseError};
use light_status_render::{parse_color, Color, FontSpec};

/// 旧式单横线多字母参数到长参数的映射
const LEGACY_FLAGS: &[(&str, &str)] = &[
    ("-Tl", "--text-left"),
    ("-Tr", "--text-right"),
    ("-Tt", "--text-top"),
    ("-Tb", "--text-bottom"),
    ("-Tf", "--font"),
    ("-Tc", "--text-color"),
    ("-Xn", "--window-name"),
    ("-Xc", "--window-class"),
    ("-Xm", "--monitor"),
    ("-Xp", "--mouse"),
    ("-Xs", "--monitors"),
];

const AFTER_HELP: &str = "\
<data-command> is run with `sh -c` and every line it prints is shown.
    The command should periodically print a value, for example:
        \"while true; do echo `date`; sleep 1; done\"
    or
        \"slstatus -s\"

<align> can be:
    C - center
    U - unset (default)
    <number> - offset in pixels

<color> should be in hex format with leading # (#000fff)

<font> should be in pattern: <font-name>[:size=<font-size>]
    <font-name> can be an actual name or a family name - monospace, sans, etc.

<monitor> can be:
    0 - primary monitor
    <number> - other monitors
    F - focused monitor, deduced from mouse position

<monitors> is a comma separated list of name:index:width:height:x:y,
    it replaces the monitor layout reported by the X server.

<mouse x:mouse y:center> is the mouse position, for example: 100:200:00
    This is needed for Wayland, because it doesn't give the right mouse position
        in context of monitors.
    Center types:
        -1: absolute position
            Relative to the whole screen space:
        00: X---,---,
            |   |   |
            |---+---|
            |   |   |
            '---'---'
        10: ,---X---,
            |   |   |
            |---+---|
            |   |   |
            '---'---'
        01: ,---,---,
            |   |   |
            X---+---|
            |   |   |
            '---'---'
        11: ,---,---,
            |   |   |
            |---X---|
            |   |   |
            '---'---'
";

#[derive(Parser, Debug)]
#[command(
    name = "light-status",
    version,
    about = "Always-on-top status panel fed by a command's output",
    disable_help_flag = true,
    allow_negative_numbers = true,
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Display help
    #[arg(long, action = ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,

    /// Data collection command
    #[arg(short = 'i', long = "command", value_name = "data-command", env = "LIGHT_STATUS_COMMAND")]
    pub command: Option<String>,

    /// Maximum length of one status line in bytes
    #[arg(long, value_name = "bytes")]
    pub max_status_len: Option<usize>,

    /// Panel width
    #[arg(
        short = 'w',
        long,
        value_parser = value_parser!(i32).range(1..=i64::from(u16::MAX)),
        help_heading = "Panel"
    )]
    pub width: Option<i32>,

    /// Panel height
    #[arg(
        short = 'h',
        long,
        value_parser = value_parser!(i32).range(1..=i64::from(u16::MAX)),
        help_heading = "Panel"
    )]
    pub height: Option<i32>,

    /// Panel left alignment
    #[arg(short = 'l', long, value_name = "align", help_heading = "Panel")]
    pub left: Option<Align>,

    /// Panel right alignment
    #[arg(short = 'r', long, value_name = "align", help_heading = "Panel")]
    pub right: Option<Align>,

    /// Panel top alignment
    #[arg(short = 't', long, value_name = "align", help_heading = "Panel")]
    pub top: Option<Align>,

    /// Panel bottom alignment
    #[arg(short = 'b', long, value_name = "align", help_heading = "Panel")]
    pub bottom: Option<Align>,

    /// Panel color
    #[arg(short = 'c', long, value_name = "color", value_parser = parse_color, help_heading = "Panel")]
    pub background: Option<Color>,

    /// Text left alignment (-Tl)
    #[arg(long, value_name = "align", help_heading = "Text")]
    pub text_left: Option<Align>,

    /// Text right alignment (-Tr)
    #[arg(long, value_name = "align", help_heading = "Text")]
    pub text_right: Option<Align>,

    /// Text top alignment (-Tt)
    #[arg(long, value_name = "align", help_heading = "Text")]
    pub text_top: Option<Align>,

    /// Text bottom alignment (-Tb)
    #[arg(long, value_name = "align", help_heading = "Text")]
    pub text_bottom: Option<Align>,

    /// Font pattern, repeat to list fallbacks in order (-Tf)
    #[arg(long = "font", value_name = "font", help_heading = "Text")]
    pub fonts: Vec<FontSpec>,

    /// Text color (-Tc)
    #[arg(long, value_name = "color", value_parser = parse_color, help_heading = "Text")]
    pub text_color: Option<Color>,

    /// Window name (-Xn)
    #[arg(long, value_name = "name", help_heading = "Xorg properties")]
    pub window_name: Option<String>,

    /// Window class (-Xc)
    #[arg(long, value_name = "class", help_heading = "Xorg properties")]
    pub window_class: Option<String>,

    /// Monitor number (-Xm)
    #[arg(long, value_name = "monitor", help_heading = "Xorg properties")]
    pub monitor: Option<MonitorSelection>,

    /// Mouse position (-Xp)
    #[arg(long, value_name = "mouse x:mouse y:center", help_heading = "Xorg properties")]
    pub mouse: Option<MousePosition>,

    /// Explicit monitor layout (-Xs)
    #[arg(long, value_name = "monitors", help_heading = "Xorg properties")]
    pub monitors: Option<MonitorList>,
}

/// `-Xs` 的值：逗号分隔的显示器列表
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorList(pub Vec<MonitorSpec>);

impl FromStr for MonitorList {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MonitorSpec::parse_list(s).map(Self)
    }
}

impl Cli {
    /// 解析进程参数；`--help` 以 0 退出，其余错误打印到 stdout 并以 1 退出
    pub fn parse_args() -> Self {
        match Self::try_parse_from(rewrite_legacy_args(std::env::args_os())) {
            Ok(cli) => cli,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
            Err(e) => {
                print!("{}", e.render());
                std::process::exit(1);
            }
        }
    }
}

/// 把旧式参数改写成 clap 认识的长参数
pub fn rewrite_legacy_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            LEGACY_FLAGS
                .iter()
                .find(|(legacy, _)| arg == **legacy)
                .map(|(_, long)| OsString::from(long))
                .unwrap_or(arg)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use light_status_geometry::{Anchor, Rect};
    use light_status_render::FontFamily;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        let args = std::iter::once("light-status")
            .chain(args.iter().copied())
            .map(OsString::from);
        Cli::try_parse_from(rewrite_legacy_args(args))
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn legacy_flags_are_rewritten() {
        let cli = parse(&[
            "-w", "800", "-h", "30", "-t", "U", "-b", "0", "-Tl", "10", "-Tb", "C", "-Tf",
            "monospace:size=12", "-Tc", "#ff0000", "-Xn", "bar", "-Xm", "1", "-Xp", "5:6:11",
            "-i", "date",
        ])
        .unwrap();

        assert_eq!(cli.width, Some(800));
        assert_eq!(cli.height, Some(30));
        assert_eq!(cli.top, Some(Align::Unset));
        assert_eq!(cli.bottom, Some(Align::Offset(0)));
        assert_eq!(cli.text_left, Some(Align::Offset(10)));
        assert_eq!(cli.text_bottom, Some(Align::Center));
        assert_eq!(cli.fonts, [FontSpec::from_points(FontFamily::Monospace, 12.0)]);
        assert_eq!(cli.text_color, Some(Color::from_rgba8(255, 0, 0, 255)));
        assert_eq!(cli.window_name.as_deref(), Some("bar"));
        assert_eq!(cli.monitor, Some(MonitorSelection::Index(1)));
        assert_eq!(
            cli.mouse,
            Some(MousePosition {
                x: 5,
                y: 6,
                anchor: Anchor::Center
            })
        );
        assert_eq!(cli.command.as_deref(), Some("date"));
    }

    #[test]
    fn numeric_values_read_leading_digits() {
        let cli = parse(&["-l", "10px", "-Tt", "middle", "-Xm", "primary"]).unwrap();
        assert_eq!(cli.left, Some(Align::Offset(10)));
        assert_eq!(cli.text_top, Some(Align::Offset(0)));
        assert_eq!(cli.monitor, Some(MonitorSelection::Index(0)));
    }

    #[test]
    fn negative_offsets_are_values() {
        let cli = parse(&["-l", "-20", "--text-right", "-4"]).unwrap();
        assert_eq!(cli.left, Some(Align::Offset(-20)));
        assert_eq!(cli.text_right, Some(Align::Offset(-4)));
    }

    #[test]
    fn monitor_specs_flag() {
        let cli = parse(&["-Xs", "DP-1:0:1920:1080:0:0,HDMI-1:1:1920:1080:1920:0"]).unwrap();
        let MonitorList(specs) = cli.monitors.unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[1].rect, Rect::new(1920, 0, 1920, 1080));
    }

    #[test]
    fn malformed_values_are_rejected() {
        for args in [
            &["-Xp", "100:200"][..],
            &["-Xs", "DP-1:0:1920"][..],
            &["-c", "red"][..],
            &["-Tf", ":size=10"][..],
            &["-w", "0"][..],
        ] {
            let err = parse(args).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "{args:?}");
        }
    }

    #[test]
    fn repeated_fonts_keep_order() {
        let cli = parse(&["-Tf", "Hack:pixelsize=14", "-Tf", "monospace"]).unwrap();
        let families: Vec<_> = cli.fonts.iter().map(|f| f.family.clone()).collect();
        assert_eq!(families, [FontFamily::Named("Hack".into()), FontFamily::Monospace]);
    }

    #[test]
    fn help_is_long_only() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }
}
