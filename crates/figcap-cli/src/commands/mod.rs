pub mod extract;
pub mod run;

use figcap_core::extraction::FigureDefaults;
use figcap_core::ExtractOptions;

pub fn extract_options(legacy_carry_over: bool) -> ExtractOptions {
    ExtractOptions {
        figure_defaults: if legacy_carry_over {
            FigureDefaults::CarryOver
        } else {
            FigureDefaults::Reset
        },
    }
}
