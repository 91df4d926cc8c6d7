//! Dataset template resolution.
//!
//! Templates contain `{placeholder}` markers that are replaced with the
//! canonical string of the coverage's resolved axis values. Anything else is
//! copied verbatim, including shell-glob characters (`*`, `?`, `[...]`),
//! which are expanded later by the remote fetch layer. Placeholders that do
//! not apply to a coverage are left untouched.

use tracing::debug;

use crate::coverage::{Coverage, DatasetLocator};

/// Placeholder names understood by the resolver.
pub mod placeholders {
    pub const CLIMATIC_INDICATOR: &str = "climatic_indicator";
    pub const SCENARIO: &str = "scenario";
    pub const YEAR_PERIOD: &str = "year_period";
    pub const FORECAST_MODEL: &str = "forecast_model";
    pub const FORECAST_MODEL_BASE_PATH: &str = "forecast_model_base_path";
    pub const FORECAST_MODEL_UNCERTAINTIES_BASE_PATH: &str =
        "forecast_model_uncertainties_base_path";
    pub const TIME_WINDOW: &str = "time_window";
    pub const DECADE: &str = "decade";
    pub const REFERENCE_PERIOD: &str = "reference_period";
    pub const SPATIAL_REGION: &str = "spatial_region";
}

/// Which of a coverage's datasets a locator points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorKind {
    Main,
    LowerUncertainty,
    UpperUncertainty,
}

/// Substitute `{name}` placeholders found in `values`.
///
/// Unknown placeholders and unbalanced braces are copied as-is.
pub fn render_template(template: &str, values: &[(&str, String)]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let name = after_open
            .find('}')
            .map(|close| &after_open[..close])
            .filter(|name| is_placeholder_name(name));

        match name.and_then(|name| values.iter().find(|(key, _)| *key == name).map(|v| (name, v))) {
            Some((name, (_, value))) => {
                rendered.push_str(value);
                rest = &after_open[name.len() + 1..];
            }
            None => {
                if let Some(name) = name {
                    debug!(placeholder = name, template, "leaving template placeholder unresolved");
                }
                rendered.push('{');
                rest = after_open;
            }
        }
    }

    rendered.push_str(rest);
    rendered
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

impl Coverage {
    /// Placeholder values for this coverage.
    ///
    /// The indicator placeholder resolves to the short indicator name, not
    /// its full identifier.
    pub fn template_values(&self) -> Vec<(&'static str, String)> {
        use placeholders::*;

        match self {
            Coverage::Forecast(c) => {
                let mut values = vec![
                    (CLIMATIC_INDICATOR, c.configuration.indicator.name.clone()),
                    (SPATIAL_REGION, c.configuration.spatial_region.name.clone()),
                    (SCENARIO, c.scenario.as_str().to_string()),
                    (YEAR_PERIOD, c.year_period.as_str().to_string()),
                    (FORECAST_MODEL, c.model.name.clone()),
                    (FORECAST_MODEL_BASE_PATH, c.model.base_path.clone()),
                    (
                        FORECAST_MODEL_UNCERTAINTIES_BASE_PATH,
                        c.model.uncertainties_base_path().to_string(),
                    ),
                ];
                if let Some(time_window) = &c.time_window {
                    values.push((TIME_WINDOW, time_window.name.clone()));
                }
                values
            }
            Coverage::Historical(c) => {
                let mut values = vec![
                    (CLIMATIC_INDICATOR, c.configuration.indicator.name.clone()),
                    (SPATIAL_REGION, c.configuration.spatial_region.name.clone()),
                    (YEAR_PERIOD, c.year_period.as_str().to_string()),
                ];
                if let Some(decade) = c.decade {
                    values.push((DECADE, decade.as_str().to_string()));
                }
                if let Some(reference_period) = c.configuration.reference_period {
                    values.push((REFERENCE_PERIOD, reference_period.as_str().to_string()));
                }
                values
            }
        }
    }

    fn render(&self, template: &str) -> String {
        render_template(template, &self.template_values())
    }

    fn render_optional(&self, template: Option<&String>) -> Option<String> {
        template.map(|t| self.render(t))
    }

    pub fn main_url(&self) -> String {
        self.render(&self.templates().main_url)
    }

    pub fn main_variable(&self) -> String {
        self.render(&self.templates().main_variable)
    }

    pub fn lower_uncertainty_url(&self) -> Option<String> {
        self.render_optional(self.templates().lower_uncertainty_url.as_ref())
    }

    pub fn lower_uncertainty_variable(&self) -> Option<String> {
        self.render_optional(self.templates().lower_uncertainty_variable.as_ref())
    }

    pub fn upper_uncertainty_url(&self) -> Option<String> {
        self.render_optional(self.templates().upper_uncertainty_url.as_ref())
    }

    pub fn upper_uncertainty_variable(&self) -> Option<String> {
        self.render_optional(self.templates().upper_uncertainty_variable.as_ref())
    }

    pub fn wms_main_layer_name(&self) -> Option<String> {
        self.render_optional(self.templates().wms_main_layer_name.as_ref())
    }

    pub fn wms_secondary_layer_name(&self) -> Option<String> {
        self.render_optional(self.templates().wms_secondary_layer_name.as_ref())
    }

    /// Locator of the main dataset. Always present.
    pub fn main_locator(&self) -> DatasetLocator {
        DatasetLocator {
            url: self.main_url(),
            variable: self.main_variable(),
        }
    }

    /// Locator of the lower uncertainty band, if both its templates exist.
    pub fn lower_uncertainty_locator(&self) -> Option<DatasetLocator> {
        Some(DatasetLocator {
            url: self.lower_uncertainty_url()?,
            variable: self.lower_uncertainty_variable()?,
        })
    }

    /// Locator of the upper uncertainty band, if both its templates exist.
    pub fn upper_uncertainty_locator(&self) -> Option<DatasetLocator> {
        Some(DatasetLocator {
            url: self.upper_uncertainty_url()?,
            variable: self.upper_uncertainty_variable()?,
        })
    }

    pub fn locator(&self, kind: LocatorKind) -> Option<DatasetLocator> {
        match kind {
            LocatorKind::Main => Some(self.main_locator()),
            LocatorKind::LowerUncertainty => self.lower_uncertainty_locator(),
            LocatorKind::UpperUncertainty => self.upper_uncertainty_locator(),
        }
    }

    /// All locators this coverage has, main first.
    pub fn locators(&self) -> Vec<(LocatorKind, DatasetLocator)> {
        [
            LocatorKind::Main,
            LocatorKind::LowerUncertainty,
            LocatorKind::UpperUncertainty,
        ]
        .into_iter()
        .filter_map(|kind| self.locator(kind).map(|locator| (kind, locator)))
        .collect()
    }
}
