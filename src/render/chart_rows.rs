use serde_json::{Map, Value};

use crate::state::curve::CurveSet;

/// One x position of the chart with every curve's value at that index.
/// `values` is in legend order, parallel to `CurveSet::ids()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    pub index: usize,
    pub values: Vec<f64>,
}

/// Reshape column-oriented curves into per-index rows.
pub fn chart_rows(curves: &CurveSet) -> Vec<ChartRow> {
    (0..curves.sample_count())
        .map(|index| ChartRow {
            index,
            values: curves
                .iter()
                .map(|c| c.value_at(index).unwrap_or(f64::NAN))
                .collect(),
        })
        .collect()
}

/// Rows as JSON objects keyed by curve id: `{"index": 0, "curve1": 12.5, ...}`.
pub fn rows_to_json(curves: &CurveSet) -> Value {
    let ids = curves.ids();
    let rows = chart_rows(curves)
        .into_iter()
        .map(|row| {
            let mut obj = Map::new();
            obj.insert("index".to_string(), Value::from(row.index));
            for (id, v) in ids.iter().zip(row.values) {
                obj.insert(id.clone(), Value::from(v));
            }
            Value::Object(obj)
        })
        .collect();
    Value::Array(rows)
}

/// Write rows as CSV with an `index` column followed by one column per curve name.
pub fn write_csv<W: std::io::Write>(curves: &CurveSet, out: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["index".to_string()];
    header.extend(curves.iter().map(|c| c.name.clone()));
    writer.write_record(&header)?;

    for row in chart_rows(curves) {
        let mut record = vec![row.index.to_string()];
        record.extend(row.values.iter().map(|v| format!("{v:.3}")));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::curve::{color_for_index, Curve};

    fn two_curves() -> CurveSet {
        CurveSet::new(vec![
            Curve::new("a", "Alpha", color_for_index(0), vec![1.0, 2.0, 3.0]),
            Curve::new("b", "Beta", color_for_index(1), vec![10.0, 20.0, 30.0]),
        ])
        .unwrap()
    }

    #[test]
    fn rows_transpose_columns() {
        let rows = chart_rows(&two_curves());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], ChartRow { index: 0, values: vec![1.0, 10.0] });
        assert_eq!(rows[2], ChartRow { index: 2, values: vec![3.0, 30.0] });
    }

    #[test]
    fn json_rows_are_keyed_by_curve_id() {
        let json = rows_to_json(&two_curves());
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1]["index"], 1);
        assert_eq!(rows[1]["a"], 2.0);
        assert_eq!(rows[1]["b"], 20.0);
    }

    #[test]
    fn csv_has_header_and_one_line_per_index() {
        let mut buf = Vec::new();
        write_csv(&two_curves(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "index,Alpha,Beta");
        assert_eq!(lines[1], "0,1.000,10.000");
        assert_eq!(lines.len(), 4);
    }
}
