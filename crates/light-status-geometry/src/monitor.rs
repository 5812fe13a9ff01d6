use std::convert::Infallible;
use std::str::FromStr;

use crate::error::ParseError;
use crate::number::leading_int;
use crate::rect::Rect;

/// 用户声明的显示器几何信息，存在时完全替代实时查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSpec {
    pub name: String,
    pub index: i32,
    pub rect: Rect,
}

impl MonitorSpec {
    /// 解析逗号分隔的列表，保持声明顺序
    pub fn parse_list(s: &str) -> Result<Vec<MonitorSpec>, ParseError> {
        s.split(',')
            .filter(|entry| !entry.trim().is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for MonitorSpec {
    type Err = ParseError;

    /// `name:index:width:height:x:y`，多出的字段忽略
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| ParseError::MonitorSpec {
            spec: s.to_string(),
            reason,
        };

        let mut fields = s.trim().split(':');
        let name = fields
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| err("missing name"))?;

        let numbers = fields
            .take(5)
            .map(|field| field.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| err("fields must be integers"))?;
        let [index, w, h, x, y] = numbers[..] else {
            return Err(err("expected five numeric fields after the name"));
        };
        if w < 0 || h < 0 {
            return Err(err("size must not be negative"));
        }

        Ok(Self {
            name: name.to_string(),
            index,
            rect: Rect::new(x, y, w, h),
        })
    }
}

/// 首选显示器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonitorSelection {
    /// 鼠标所在的显示器
    #[default]
    Focused,
    Index(i32),
}

impl FromStr for MonitorSelection {
    type Err = Infallible;

    /// `F` 为鼠标所在显示器，其余取开头的整数作为序号
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.chars().next() {
            Some('F') => MonitorSelection::Focused,
            _ => MonitorSelection::Index(leading_int(s)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spec_list_in_order() {
        let specs = MonitorSpec::parse_list("DP-1:0:1920:1080:0:0,HDMI-1:1:1920:1080:1920:0")
            .expect("valid specs");
        assert_eq!(
            specs,
            vec![
                MonitorSpec {
                    name: "DP-1".into(),
                    index: 0,
                    rect: Rect::new(0, 0, 1920, 1080),
                },
                MonitorSpec {
                    name: "HDMI-1".into(),
                    index: 1,
                    rect: Rect::new(1920, 0, 1920, 1080),
                },
            ]
        );
    }

    #[test]
    fn accepts_negative_origins() {
        let spec: MonitorSpec = "left:2:1280:1024:-1280:56".parse().expect("valid spec");
        assert_eq!(spec.rect, Rect::new(-1280, 56, 1280, 1024));
    }

    #[test]
    fn rejects_malformed_specs() {
        for input in [
            ":0:1920:1080:0:0",
            "DP-1:0:1920:1080:0",
            "DP-1",
            "DP-1:0:wide:1080:0:0",
            "DP-1:0:-1920:1080:0:0",
        ] {
            assert!(
                matches!(input.parse::<MonitorSpec>(), Err(ParseError::MonitorSpec { .. })),
                "{input}"
            );
        }
        assert!(MonitorSpec::parse_list("DP-1:0:1920:1080:0:0,broken").is_err());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let spec: MonitorSpec = "DP-1:0:1920:1080:0:0:7:primary".parse().expect("valid spec");
        assert_eq!(spec.index, 0);
        assert_eq!(spec.rect, Rect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn parses_monitor_selection() {
        assert_eq!("F".parse(), Ok(MonitorSelection::Focused));
        assert_eq!("0".parse(), Ok(MonitorSelection::Index(0)));
        assert_eq!("2".parse(), Ok(MonitorSelection::Index(2)));
        assert_eq!("1st".parse(), Ok(MonitorSelection::Index(1)));
        assert_eq!("primary".parse(), Ok(MonitorSelection::Index(0)));
    }
}
