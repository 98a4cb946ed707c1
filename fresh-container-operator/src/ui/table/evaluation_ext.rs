//! Renders one oracle evaluation as a table.

use comfy_table::{Cell, ContentArrangement};

use crate::oracle::{ImageUpgradeEvaluation, Readiness};

pub trait ReadinessExt {
    /// Renders the evaluation into a human-readable table string.
    fn render_table(&self) -> String;
}

impl ReadinessExt for Readiness {
    fn render_table(&self) -> String {
        let Self::Ready(evaluation) = self else {
            return "Evaluation is not ready yet, try again later\n".to_string();
        };
        let ImageUpgradeEvaluation { image, constraint, current_version, next_version, stale } =
            evaluation;

        comfy_table::Table::new()
            .load_preset(comfy_table::presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["IMAGE", "CONSTRAINT", "CURRENT", "NEXT", "STALE"])
            .add_row([
                Cell::new(image),
                Cell::new(constraint),
                Cell::new(current_version),
                Cell::new(next_version),
                Cell::new(stale),
            ])
            .to_string()
    }
}
