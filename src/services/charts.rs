// src/services/charts.rs
//! Plotly figure JSON for the price charts. The frontend hands the strings
//! straight to `Plotly.newPlot`.

use serde::Serialize;

use crate::models::PriceBar;

pub const CHART_WIDTH: u32 = 1200;
pub const CHART_HEIGHT: u32 = 600;

#[derive(Debug, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub hovertemplate: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stackgroup: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct Axis {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autorange: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct Layout {
    pub title: Title,
    pub width: u32,
    pub height: u32,
    pub xaxis: Axis,
    pub yaxis: Axis,
}

fn close_trace(bars: &[PriceBar]) -> Trace {
    Trace {
        kind: "scatter",
        mode: "lines",
        name: String::new(),
        x: bars.iter().map(PriceBar::display_date).collect(),
        y: bars.iter().map(|b| b.close).collect(),
        hovertemplate: "Date=%{x}<br>Close=%{y}<extra></extra>",
        fill: None,
        stackgroup: None,
    }
}

fn layout(title: String) -> Layout {
    Layout {
        title: Title { text: title },
        width: CHART_WIDTH,
        height: CHART_HEIGHT,
        xaxis: Axis {
            title: Title { text: "Date".to_string() },
            autorange: Some("reversed"),
        },
        yaxis: Axis {
            title: Title { text: "Close".to_string() },
            autorange: None,
        },
    }
}

pub fn line_chart(ticker: &str, bars: &[PriceBar]) -> Figure {
    Figure {
        data: vec![close_trace(bars)],
        layout: layout(format!("{} Stock Price Over Time", ticker)),
    }
}

pub fn area_chart(ticker: &str, bars: &[PriceBar]) -> Figure {
    let mut trace = close_trace(bars);
    trace.fill = Some("tonexty");
    trace.stackgroup = Some("1");
    Figure {
        data: vec![trace],
        layout: layout(format!("{} Stock Price Bar Chart", ticker)),
    }
}

pub fn to_json(figure: &Figure) -> serde_json::Result<String> {
    serde_json::to_string(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::clean_rows;
    use crate::test_support::rows_from;
    use serde_json::Value;

    #[test]
    fn test_line_chart_layout() {
        let bars = clean_rows(&rows_from(&[(2024, 6, 3, 194.03), (2024, 6, 4, 194.35)]));
        let figure: Value = serde_json::from_str(&to_json(&line_chart("AAPL", &bars)).unwrap()).unwrap();

        assert_eq!(figure["layout"]["width"], 1200);
        assert_eq!(figure["layout"]["height"], 600);
        assert_eq!(figure["layout"]["xaxis"]["autorange"], "reversed");
        assert_eq!(figure["layout"]["title"]["text"], "AAPL Stock Price Over Time");
        assert_eq!(figure["data"][0]["type"], "scatter");
        assert_eq!(figure["data"][0]["x"][0], "03-06-2024");
        assert_eq!(figure["data"][0]["y"][1], 194.35);
        assert!(figure["data"][0].get("fill").is_none());
    }

    #[test]
    fn test_area_chart_fills() {
        let bars = clean_rows(&rows_from(&[(2024, 6, 3, 194.03)]));
        let figure: Value = serde_json::from_str(&to_json(&area_chart("AAPL", &bars)).unwrap()).unwrap();

        assert_eq!(figure["layout"]["title"]["text"], "AAPL Stock Price Bar Chart");
        assert_eq!(figure["layout"]["xaxis"]["autorange"], "reversed");
        assert_eq!(figure["data"][0]["fill"], "tonexty");
        assert_eq!(figure["data"][0]["stackgroup"], "1");
    }

    #[test]
    fn test_chart_keeps_bar_order() {
        let mut bars = clean_rows(&rows_from(&[(2024, 6, 3, 1.0), (2024, 6, 4, 2.0)]));
        bars.reverse();
        let figure = line_chart("X", &bars);
        assert_eq!(figure.data[0].x, vec!["04-06-2024".to_string(), "03-06-2024".to_string()]);
    }
}
