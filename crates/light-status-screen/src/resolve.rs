use anyhow::{bail, Result};
use light_status_geometry::{MonitorSelection, MonitorSpec, MousePosition, Rect};
use tracing::{debug, info};

use crate::query::DisplayQuery;

/// 解析出的目标区域
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRegion {
    pub rect: Rect,
    pub source: RegionSource,
}

/// 目标区域来自哪一级
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionSource {
    /// 用户声明的显示器
    Spec { name: String },
    /// 实时拓扑中的第 `index` 个显示器
    Topology { index: usize },
    /// 默认屏幕，原点在 (0, 0)
    DefaultScreen,
}

/// 决定面板所在的显示区域
///
/// 优先级：用户声明的显示器 > 实时拓扑 > 默认屏幕。
/// `default_index` 只在 `selection` 为 `Focused` 且存在声明时使用。
pub fn resolve_target_rect(
    specs: &[MonitorSpec],
    selection: MonitorSelection,
    default_index: i32,
    mouse: Option<&MousePosition>,
    query: &impl DisplayQuery,
) -> TargetRegion {
    if let Some(region) = from_specs(specs, selection, default_index) {
        return region;
    }

    match from_topology(selection, mouse, query) {
        Ok(region) => region,
        Err(e) => {
            info!("{e}, using default screen");
            let (w, h) = query.default_screen_size();
            TargetRegion {
                rect: Rect::sized(w, h),
                source: RegionSource::DefaultScreen,
            }
        }
    }
}

fn from_specs(
    specs: &[MonitorSpec],
    selection: MonitorSelection,
    default_index: i32,
) -> Option<TargetRegion> {
    let wanted = match selection {
        MonitorSelection::Index(index) => index,
        MonitorSelection::Focused => default_index,
    };
    // 没有匹配时退回第一个声明
    let spec = specs
        .iter()
        .find(|spec| spec.index == wanted)
        .or_else(|| specs.first())?;

    debug!(name = %spec.name, index = spec.index, wanted, "using declared monitor");
    Some(TargetRegion {
        rect: spec.rect,
        source: RegionSource::Spec {
            name: spec.name.clone(),
        },
    })
}

fn from_topology(
    selection: MonitorSelection,
    mouse: Option<&MousePosition>,
    query: &impl DisplayQuery,
) -> Result<TargetRegion> {
    let monitors = query.monitors()?;
    if monitors.is_empty() {
        bail!("no screens found");
    }

    let preferred = match selection {
        MonitorSelection::Index(i) => usize::try_from(i).ok().filter(|&i| i < monitors.len()),
        MonitorSelection::Focused => None,
    };
    let index = match preferred {
        Some(index) => index,
        None => focused_index(&monitors, mouse, query)?,
    };

    Ok(TargetRegion {
        rect: monitors[index],
        source: RegionSource::Topology { index },
    })
}

/// 找到参考点所在的显示器
fn focused_index(
    monitors: &[Rect],
    mouse: Option<&MousePosition>,
    query: &impl DisplayQuery,
) -> Result<usize> {
    let (x, y) = match mouse {
        Some(position) => {
            let Some(space) = Rect::bounding(monitors) else {
                bail!("no screens found");
            };
            position.to_absolute(&space)
        }
        None => query.pointer()?,
    };
    debug!(x, y, "mouse position");

    for (i, monitor) in monitors.iter().enumerate() {
        debug!(i, %monitor, "screen");
    }

    if let Some(index) = monitors.iter().position(|monitor| monitor.contains(x, y)) {
        return Ok(index);
    }
    // 指针不在任何显示器上
    let fallback = query.default_screen();
    Ok(if fallback < monitors.len() { fallback } else { 0 })
}
