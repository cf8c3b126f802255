//! Per-zoom scale thresholds.
//!
//! A zoom list of scale denominators `[z0, z1, ..., zN-1]` becomes a table of
//! named thresholds that rules reference by index:
//!
//! | name               | value      | range            |
//! |--------------------|------------|------------------|
//! | `maxscale_zoom<i>` | `zooms[i]` | `i in 0..=N-2`   |
//! | `minscale_zoom<i>` | `zooms[i+1]` | `i in 1..=N-2` |
//!
//! Each threshold is declared once as a document entity and expanded wherever
//! a rule refers to it.

use std::fmt;

use super::writer::XmlWriter;

/// Which side of a visibility window a threshold bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThresholdKind {
    /// Rule is hidden beyond this scale (`MaxScaleDenominator`)
    MaxScale,
    /// Rule is hidden below this scale (`MinScaleDenominator`)
    MinScale,
}

impl ThresholdKind {
    fn prefix(&self) -> &'static str {
        match self {
            ThresholdKind::MaxScale => "maxscale",
            ThresholdKind::MinScale => "minscale",
        }
    }

    fn element(&self) -> &'static str {
        match self {
            ThresholdKind::MaxScale => "MaxScaleDenominator",
            ThresholdKind::MinScale => "MinScaleDenominator",
        }
    }
}

impl fmt::Display for ThresholdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// One named scale threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleThreshold {
    pub kind: ThresholdKind,
    pub zoom_index: usize,
    pub denominator: f64,
}

impl ScaleThreshold {
    /// Entity name, e.g. `maxscale_zoom0`.
    pub fn name(&self) -> String {
        format!("{}_zoom{}", self.kind.prefix(), self.zoom_index)
    }

    /// Entity replacement text, e.g.
    /// `<MaxScaleDenominator>1000</MaxScaleDenominator>`.
    pub fn definition(&self) -> String {
        let element = self.kind.element();
        format!("<{0}>{1}</{0}>", element, self.denominator)
    }

    /// Reference expanded inside a rule, e.g. `&maxscale_zoom0;`.
    pub fn reference(&self) -> String {
        format!("&{};", self.name())
    }
}

/// Ordered threshold table: max-scale entries first, then min-scale, each by
/// ascending index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScaleThresholds {
    entries: Vec<ScaleThreshold>,
}

impl ScaleThresholds {
    /// Builds the table from scale denominators ordered by zoom level.
    ///
    /// Fewer than two zooms yields an empty table.
    pub fn build(zooms: &[f64]) -> Self {
        let n = zooms.len();
        if n < 2 {
            return Self::default();
        }

        let max = zooms[..n - 1]
            .iter()
            .enumerate()
            .map(|(i, &denominator)| ScaleThreshold {
                kind: ThresholdKind::MaxScale,
                zoom_index: i,
                denominator,
            });
        let min = zooms[2..]
            .iter()
            .enumerate()
            .map(|(offset, &denominator)| ScaleThreshold {
                kind: ThresholdKind::MinScale,
                zoom_index: offset + 1,
                denominator,
            });

        Self {
            entries: max.chain(min).collect(),
        }
    }

    pub fn get(&self, kind: ThresholdKind, zoom_index: usize) -> Option<&ScaleThreshold> {
        self.entries
            .iter()
            .find(|t| t.kind == kind && t.zoom_index == zoom_index)
    }

    pub fn contains(&self, kind: ThresholdKind, zoom_index: usize) -> bool {
        self.get(kind, zoom_index).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScaleThreshold> {
        self.entries.iter()
    }

    pub fn count(&self, kind: ThresholdKind) -> usize {
        self.entries.iter().filter(|t| t.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the `<!DOCTYPE Map [...]>` block declaring every threshold.
    ///
    /// Nothing is written for an empty table.
    pub(crate) fn write_declarations(&self, w: &mut XmlWriter) {
        if self.is_empty() {
            return;
        }
        w.line("<!DOCTYPE Map [");
        for threshold in &self.entries {
            w.line(&format!(
                "<!ENTITY {} \"{}\">",
                threshold.name(),
                threshold.definition()
            ));
        }
        w.line("]>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(table: &ScaleThresholds) -> Vec<String> {
        table.iter().map(ScaleThreshold::name).collect()
    }

    #[test]
    fn test_build_three_zooms() {
        let table = ScaleThresholds::build(&[1000.0, 2000.0, 3000.0]);

        assert_eq!(
            names(&table),
            ["maxscale_zoom0", "maxscale_zoom1", "minscale_zoom1"]
        );
        assert_eq!(
            table.get(ThresholdKind::MaxScale, 0).unwrap().denominator,
            1000.0
        );
        assert_eq!(
            table.get(ThresholdKind::MaxScale, 1).unwrap().denominator,
            2000.0
        );
        assert_eq!(
            table.get(ThresholdKind::MinScale, 1).unwrap().denominator,
            3000.0
        );
    }

    #[test]
    fn test_threshold_counts_for_every_length() {
        for n in 0..12usize {
            let zooms: Vec<f64> = (0..n).map(|i| 500.0 * (i as f64 + 1.0)).collect();
            let table = ScaleThresholds::build(&zooms);

            assert_eq!(table.count(ThresholdKind::MaxScale), n.saturating_sub(1), "n={}", n);
            assert_eq!(table.count(ThresholdKind::MinScale), n.saturating_sub(2), "n={}", n);
        }
    }

    #[test]
    fn test_min_scale_value_is_next_zoom() {
        let zooms = [100.0, 200.0, 400.0, 800.0, 1600.0];
        let table = ScaleThresholds::build(&zooms);

        for i in 1..=zooms.len() - 2 {
            let t = table.get(ThresholdKind::MinScale, i).unwrap();
            assert_eq!(t.denominator, zooms[i + 1]);
        }
        assert!(!table.contains(ThresholdKind::MinScale, 0));
        assert!(!table.contains(ThresholdKind::MinScale, zooms.len() - 1));
        assert!(!table.contains(ThresholdKind::MaxScale, zooms.len() - 1));
    }

    #[test]
    fn test_short_lists_are_empty() {
        assert!(ScaleThresholds::build(&[]).is_empty());
        assert!(ScaleThresholds::build(&[5000.0]).is_empty());
        assert_eq!(ScaleThresholds::build(&[5000.0, 2500.0]).len(), 1);
    }

    #[test]
    fn test_definition_and_reference_text() {
        let t = ScaleThreshold {
            kind: ThresholdKind::MinScale,
            zoom_index: 3,
            denominator: 2500.5,
        };
        assert_eq!(t.name(), "minscale_zoom3");
        assert_eq!(
            t.definition(),
            "<MinScaleDenominator>2500.5</MinScaleDenominator>"
        );
        assert_eq!(t.reference(), "&minscale_zoom3;");
    }

    #[test]
    fn test_whole_numbers_have_no_fraction() {
        let table = ScaleThresholds::build(&[1000.0, 2000.0]);
        assert_eq!(
            table.iter().next().unwrap().definition(),
            "<MaxScaleDenominator>1000</MaxScaleDenominator>"
        );
    }

    #[test]
    fn test_declarations() {
        let table = ScaleThresholds::build(&[1000.0, 2000.0, 3000.0]);
        let mut w = XmlWriter::new();
        table.write_declarations(&mut w);

        assert_eq!(
            w.finish(),
            "<!DOCTYPE Map [\n\
             <!ENTITY maxscale_zoom0 \"<MaxScaleDenominator>1000</MaxScaleDenominator>\">\n\
             <!ENTITY maxscale_zoom1 \"<MaxScaleDenominator>2000</MaxScaleDenominator>\">\n\
             <!ENTITY minscale_zoom1 \"<MinScaleDenominator>3000</MinScaleDenominator>\">\n\
             ]>\n"
        );
    }

    #[test]
    fn test_empty_table_writes_nothing() {
        let mut w = XmlWriter::new();
        ScaleThresholds::build(&[1.0]).write_declarations(&mut w);
        assert_eq!(w.finish(), "");
    }
}
