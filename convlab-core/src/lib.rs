//! ConvLab Core: conversion-rate aggregation and chart windowing.
//!
//! This crate contains everything between the raw experiment export and the
//! renderer:
//! - Domain types (raw dataset, variations, processed series)
//! - Aggregator: per-day or per-ISO-week conversion rates per variation
//! - Window manager: zoom factor, pan offset, live drag panning
//! - Y-axis domain and tick derivation for the visible window
//! - View-state reducer for hosts that drive the chart interactively
//! - TOML chart configuration

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod view;
pub mod window;

pub use aggregate::{aggregate, aggregate_with, conversion_rate, AggregateError};
pub use config::{ChartConfig, ConfigError};
pub use domain::{
    DatasetError, Granularity, ProcessedPoint, ProcessedSeries, RawDataset, Variation,
    VariationRegistry,
};
pub use view::{ViewContext, ViewEvent, ViewModel, ViewState};
pub use window::{PanAffordances, WindowState, YDomain, ZoomLimits};
