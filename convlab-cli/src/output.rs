//! Output formats for the `aggregate`, `window` and `variations` commands.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use convlab_core::view::ViewModel;
use convlab_core::{Granularity, PanAffordances, ProcessedSeries, VariationRegistry, YDomain};

/// Marker printed next to the highest rate in a table row.
const LEADER_MARK: char = '*';

/// Explicit id -> rate mapping per point.
pub fn write_json<W: Write>(series: &ProcessedSeries, mut w: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut w, series)?;
    writeln!(w)?;
    Ok(())
}

/// One row per period, one `rate_<id>` column per variation.
pub fn write_csv<W: Write>(
    series: &ProcessedSeries,
    registry: &VariationRegistry,
    w: W,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(w);

    let mut header = vec!["period_key".to_string()];
    header.extend(registry.iter().map(|v| format!("rate_{}", v.id)));
    writer.write_record(&header)?;

    for point in series {
        let mut row = vec![point.period_key.clone()];
        row.extend(
            registry
                .iter()
                .map(|v| point.rate(&v.id).map(|r| format!("{r:.2}")).unwrap_or_default()),
        );
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Fixed-width table with the leading variation of each row marked.
pub fn write_table<W: Write>(
    series: &ProcessedSeries,
    registry: &VariationRegistry,
    mut w: W,
) -> Result<()> {
    let ids = registry.ids();
    let period_width = series
        .iter()
        .map(|p| p.period_key.len())
        .max()
        .unwrap_or(0)
        .max("period".len());
    let widths: Vec<usize> = registry.iter().map(|v| v.name.len().max(7)).collect();

    write!(w, "{:<period_width$}", "period")?;
    for (v, width) in registry.iter().zip(&widths) {
        write!(w, "  {:>width$} ", v.name)?;
    }
    writeln!(w)?;

    for point in series {
        let leaders = point.leaders(&ids);
        write!(w, "{:<period_width$}", point.period_key)?;
        for (v, width) in registry.iter().zip(&widths) {
            let value = point
                .rate(&v.id)
                .map(|r| format!("{r:.2}"))
                .unwrap_or_else(|| "-".to_string());
            let mark = if leaders.contains(&v.id.as_str()) {
                LEADER_MARK
            } else {
                ' '
            };
            write!(w, "  {value:>width$}{mark}")?;
        }
        writeln!(w)?;
    }

    writeln!(
        w,
        "\n{} {} period(s), {} variation(s); {LEADER_MARK} marks the highest rate",
        series.len(),
        series.granularity,
        registry.len()
    )?;
    Ok(())
}

pub fn write_variations<W: Write>(
    registry: &VariationRegistry,
    palette: &[String],
    mut w: W,
) -> Result<()> {
    let id_width = registry.iter().map(|v| v.id.len()).max().unwrap_or(0).max(2);
    let name_width = registry.iter().map(|v| v.name.len()).max().unwrap_or(0).max(4);

    writeln!(w, "{:<id_width$}  {:<name_width$}  color", "id", "name")?;
    for v in registry.iter() {
        writeln!(
            w,
            "{:<id_width$}  {:<name_width$}  {}",
            v.id,
            v.name,
            registry.color_for(v, palette)
        )?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct WindowReport<'a> {
    pub granularity: Granularity,
    pub series_len: usize,
    pub zoom_factor: f64,
    pub start_index: usize,
    pub visible_count: usize,
    pub first_period: Option<&'a str>,
    pub last_period: Option<&'a str>,
    pub y_domain: YDomain,
    pub ticks: Vec<i64>,
    pub affordances: PanAffordances,
    pub points: &'a [convlab_core::ProcessedPoint],
}

impl<'a> WindowReport<'a> {
    pub fn new(granularity: Granularity, vm: &ViewModel<'a>) -> Self {
        Self {
            granularity,
            series_len: vm.series_len,
            zoom_factor: vm.window.zoom_factor,
            start_index: vm.offset,
            visible_count: vm.points.len(),
            first_period: vm.first_period(),
            last_period: vm.last_period(),
            y_domain: vm.domain,
            ticks: vm.ticks.clone(),
            affordances: vm.affordances,
            points: vm.points,
        }
    }
}
