use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Print a success message, with `data` merged in for JSON output
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });
            if let Some(data_value) = data {
                response["data"] = data_value;
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Fixed-width text table; JSON output prints `rows` as-is
pub fn output_table(
    output_format: OutputFormat,
    headers: &[&str],
    rows: Vec<Vec<String>>,
    raw: Value,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "success": true, "data": raw }))?);
        }
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No results");
                return Ok(());
            }
            print!("{}", render_table(headers, &rows));
        }
    }
    Ok(())
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
                .max(h.len())
        })
        .collect();

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(headers.to_vec());
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table_pads_columns() {
        let table = render_table(
            &["TOPIC", "KATAS"],
            &[
                vec!["arrays".to_string(), "2".to_string()],
                vec!["dynamic-programming".to_string(), "12".to_string()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "TOPIC                KATAS");
        assert_eq!(lines[1], "arrays               2");
        assert_eq!(lines[2], "dynamic-programming  12");
    }
}
