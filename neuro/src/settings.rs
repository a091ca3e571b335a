use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Multiplier applied to elapsed seconds before they reach `u_time`.
    pub time_scale: f32,

    /// Upper bound on the device pixel ratio used to size the canvas.
    pub max_pixel_ratio: f64,

    /// Let page scrolling and the mouse wheel drive `u_scroll_progress`.
    /// Off by default: the scroll slot only changes through
    /// `Neuro::set_scroll_progress`.
    pub scroll_from_input: bool,

    /// Scroll progress gained per mouse-wheel line.
    pub scroll_sensitivity: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_pixel_ratio: 2.0,
            scroll_from_input: false,
            scroll_sensitivity: 0.05,
        }
    }
}

impl Settings {
    pub fn from_json(source: &str) -> Result<Self, crate::Problem> {
        serde_json::from_str(source).map_err(|err| crate::Problem::ReadSettings(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings = Settings::from_json(r#"{ "timeScale": 4.0 }"#).unwrap();
        assert_eq!(
            settings,
            Settings {
                time_scale: 4.0,
                ..Default::default()
            }
        );
    }

    #[test]
    fn empty_object_is_the_default() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn scroll_input_is_opt_in() {
        assert!(!Settings::default().scroll_from_input);

        let settings = Settings::from_json(r#"{ "scrollFromInput": true }"#).unwrap();
        assert!(settings.scroll_from_input);
    }

    #[test]
    fn malformed_json_is_a_settings_problem() {
        let problem = Settings::from_json(r#"{ "timeScale": "fast" }"#).unwrap_err();
        assert!(matches!(problem, crate::Problem::ReadSettings(_)));
    }
}
