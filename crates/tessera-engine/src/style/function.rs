use core::fmt;

use crate::geometry::{GeometryTileFeature, Value};

use super::Color;

/// Linear blending between two property values.
pub trait Interpolate {
    fn interpolate(a: &Self, b: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    #[inline]
    fn interpolate(a: &f32, b: &f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

impl Interpolate for Color {
    #[inline]
    fn interpolate(a: &Color, b: &Color, t: f32) -> Color {
        Color::from_premul(
            f32::interpolate(&a.r, &b.r, t),
            f32::interpolate(&a.g, &b.g, t),
            f32::interpolate(&a.b, &b.b, t),
            f32::interpolate(&a.a, &b.a, t),
        )
    }
}

/// A paint property value type that data-driven functions can produce.
pub trait PropertyValue: Clone + PartialEq + fmt::Debug + Interpolate + Send + Sync + 'static {
    /// Converts a raw feature property; `None` if the value has the wrong type.
    fn from_value(value: &Value) -> Option<Self>;
}

impl PropertyValue for f32 {
    fn from_value(value: &Value) -> Option<f32> {
        value.as_f64().map(|v| v as f32)
    }
}

impl PropertyValue for Color {
    fn from_value(value: &Value) -> Option<Color> {
        Color::from_value(value)
    }
}

/// Compiled mapping from one feature property to an output value.
#[derive(Debug, Clone, PartialEq)]
pub enum Stops<T> {
    /// Uses the property value itself.
    Identity,
    /// Interpolates between numeric stops; `base == 1` is linear.
    Exponential { base: f32, stops: Vec<(f32, T)> },
    /// Steps: the output of the greatest stop `<=` the input.
    Interval(Vec<(f32, T)>),
    /// Exact matches on the property value.
    Categorical(Vec<(Value, T)>),
}

impl<T: PropertyValue> Stops<T> {
    /// `None` when the input is missing, mistyped or matches no stop.
    pub fn evaluate(&self, input: Option<&Value>) -> Option<T> {
        let input = input?;
        match self {
            Stops::Identity => T::from_value(input),
            Stops::Exponential { base, stops } => exponential(*base, stops, finite_input(input)?),
            Stops::Interval(stops) => {
                let x = finite_input(input)?;
                let idx = stops.partition_point(|(z, _)| *z <= x);
                stops.get(idx.saturating_sub(1)).map(|(_, v)| v.clone())
            }
            Stops::Categorical(stops) => {
                stops.iter().find(|(k, _)| k == input).map(|(_, v)| v.clone())
            }
        }
    }
}

/// Numeric stop input. NaN and infinities match no stop.
fn finite_input(input: &Value) -> Option<f32> {
    let x = input.as_f64()? as f32;
    x.is_finite().then_some(x)
}

fn exponential<T: PropertyValue>(base: f32, stops: &[(f32, T)], x: f32) -> Option<T> {
    let (first, last) = (stops.first()?, stops.last()?);
    if x <= first.0 {
        return Some(first.1.clone());
    }
    if x >= last.0 {
        return Some(last.1.clone());
    }

    let idx = stops.partition_point(|(z, _)| *z <= x);
    let (lo, hi) = (stops.get(idx.checked_sub(1)?)?, stops.get(idx)?);
    let t = interpolation_factor(base, lo.0, hi.0, x);
    Some(T::interpolate(&lo.1, &hi.1, t))
}

/// Position of `x` in `[lower, upper]`, eased exponentially when `base != 1`.
pub(crate) fn interpolation_factor(base: f32, lower: f32, upper: f32, x: f32) -> f32 {
    let range = upper - lower;
    if range <= 0.0 {
        return 0.0;
    }
    let progress = x - lower;
    if (base - 1.0).abs() < f32::EPSILON {
        progress / range
    } else {
        (base.powf(progress) - 1.0) / (base.powf(range) - 1.0)
    }
}

/// Per-feature function of one property.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFunction<T> {
    pub property: String,
    pub stops: Stops<T>,
    /// Output when the feature lacks a usable value.
    pub default: T,
}

impl<T: PropertyValue> SourceFunction<T> {
    pub fn new(property: impl Into<String>, stops: Stops<T>, default: T) -> Self {
        Self { property: property.into(), stops, default }
    }

    pub fn evaluate(&self, feature: &dyn GeometryTileFeature) -> T {
        self.stops
            .evaluate(feature.value(&self.property).as_ref())
            .unwrap_or_else(|| self.default.clone())
    }
}

/// Per-feature function whose stops also vary with zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeFunction<T> {
    pub property: String,
    /// Ascending by zoom.
    pub zoom_stops: Vec<(f32, Stops<T>)>,
    pub default: T,
}

impl<T: PropertyValue> CompositeFunction<T> {
    /// Evaluates the feature at both zoom stops bracketing `zoom` and blends linearly.
    pub fn evaluate(&self, zoom: f32, feature: &dyn GeometryTileFeature) -> T {
        let value = feature.value(&self.property);
        let at = |stops: &Stops<T>| stops.evaluate(value.as_ref());

        let idx = self.zoom_stops.partition_point(|(z, _)| *z <= zoom);
        let result = match idx {
            _ if self.zoom_stops.is_empty() => None,
            0 => at(&self.zoom_stops[0].1),
            i if i == self.zoom_stops.len() => at(&self.zoom_stops[i - 1].1),
            i => {
                let (lo_zoom, lo) = &self.zoom_stops[i - 1];
                let (hi_zoom, hi) = &self.zoom_stops[i];
                let t = interpolation_factor(1.0, *lo_zoom, *hi_zoom, zoom);
                match (at(lo), at(hi)) {
                    (Some(a), Some(b)) => Some(T::interpolate(&a, &b, t)),
                    _ => None,
                }
            }
        };
        result.unwrap_or_else(|| self.default.clone())
    }
}

/// A paint property after zoom evaluation: either final or still feature-dependent.
#[derive(Debug, Clone, PartialEq)]
pub enum PossiblyEvaluated<T> {
    Constant(T),
    Source(SourceFunction<T>),
    Composite(CompositeFunction<T>),
}

impl<T: PropertyValue> PossiblyEvaluated<T> {
    #[inline]
    pub fn constant(&self) -> Option<&T> {
        match self {
            PossiblyEvaluated::Constant(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        matches!(self, PossiblyEvaluated::Constant(_))
    }

    pub fn evaluate(&self, zoom: f32, feature: &dyn GeometryTileFeature) -> T {
        match self {
            PossiblyEvaluated::Constant(v) => v.clone(),
            PossiblyEvaluated::Source(f) => f.evaluate(feature),
            PossiblyEvaluated::Composite(f) => f.evaluate(zoom, feature),
        }
    }
}

impl<T> From<T> for PossiblyEvaluated<T> {
    fn from(value: T) -> Self {
        PossiblyEvaluated::Constant(value)
    }
}
