//! HTML training report: evaluation tables, feature distribution plots and
//! the effective configuration.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::layout::{Axis, Layout};
use plotly::{Bar, Plot};

use cardia_model::facade::RiskModel;
use cardia_model::metrics::EvaluationMetrics;
use cardia_model::stats::FeatureDistribution;

use crate::config::TrainConfig;
use crate::util::write_bytes_to_file;

const PAGE_STYLE: &str = "\
    body { font-family: sans-serif; margin: 2em auto; max-width: 960px; color: #222; }\
    h1 { border-bottom: 2px solid #802020; padding-bottom: 0.2em; }\
    table { border-collapse: collapse; margin: 1em 0; }\
    th, td { border: 1px solid #bbb; padding: 0.4em 0.8em; text-align: right; }\
    th { background-color: #f0f0f0; }\
    .meta { color: #666; font-size: 0.9em; }";

/// One titled block of the report: free-form markup followed by plots.
pub struct ReportSection {
    title: String,
    content: Vec<Markup>,
    plots: Vec<Plot>,
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        ReportSection {
            title: title.to_string(),
            content: Vec::new(),
            plots: Vec::new(),
        }
    }

    pub fn add_content(&mut self, content: Markup) {
        self.content.push(content);
    }

    pub fn add_plot(&mut self, plot: Plot) {
        self.plots.push(plot);
    }

    fn render(&self, section_index: usize) -> Markup {
        let inline_plots: Vec<Markup> = self
            .plots
            .iter()
            .enumerate()
            .map(|(plot_index, plot)| {
                let div_id = format!("plot-{}-{}", section_index, plot_index);
                PreEscaped(plot.to_inline_html(Some(div_id.as_str())))
            })
            .collect();
        html! {
            section {
                h2 { (self.title) }
                @for block in &self.content {
                    (block)
                }
                @for plot in &inline_plots {
                    div class="plot" { (plot) }
                }
            }
        }
    }
}

/// A standalone HTML page assembled from sections. Plotly is pulled from its
/// CDN, so the file needs no local assets.
pub struct Report {
    title: String,
    version: String,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(title: &str, version: &str) -> Self {
        Report {
            title: title.to_string(),
            version: version.to_string(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn render(&self) -> String {
        let page = html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src="https://cdn.plot.ly/plotly-2.27.0.min.js" {}
                    style { (PreEscaped(PAGE_STYLE)) }
                }
                body {
                    header {
                        h1 { (self.title) }
                        p class="meta" {
                            "Version " (self.version)
                            ", generated "
                            (Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))
                        }
                    }
                    @for (section_index, section) in self.sections.iter().enumerate() {
                        (section.render(section_index))
                    }
                }
            }
        };
        page.into_string()
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        write_bytes_to_file(&path.to_string_lossy(), self.render().as_bytes())
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }
}

/// Bar chart of one feature's histogram, bars centered on their bins.
pub fn plot_distribution(name: &str, dist: &FeatureDistribution) -> Result<Plot, String> {
    assert_eq!(
        dist.bin_edges.len(),
        dist.histogram.len() + 1,
        "Histogram must carry one more edge than bins"
    );

    let centers: Vec<f64> = dist
        .bin_edges
        .windows(2)
        .map(|pair| (pair[0] + pair[1]) / 2.0)
        .collect();
    let counts = dist.histogram.clone();

    let title = format!("Distribution of {}", name);
    let layout = Layout::new()
        .title(title.as_str())
        .x_axis(Axis::new().title(name))
        .y_axis(Axis::new().title("Count"));

    let mut plot = Plot::new();
    plot.add_trace(Bar::new(centers, counts).name(name));
    plot.set_layout(layout);

    Ok(plot)
}

fn metrics_table(metrics: &EvaluationMetrics) -> Markup {
    html! {
        table {
            thead {
                tr { th { "Metric" } th { "Value" } }
            }
            tbody {
                tr { td { "Accuracy" } td { (format!("{:.4}", metrics.accuracy)) } }
                tr { td { "Precision" } td { (format!("{:.4}", metrics.precision)) } }
                tr { td { "Recall" } td { (format!("{:.4}", metrics.recall)) } }
                tr { td { "F1 score" } td { (format!("{:.4}", metrics.f1_score)) } }
                tr { td { "Train rows" } td { (metrics.train_size) } }
                tr { td { "Test rows" } td { (metrics.test_size) } }
                tr {
                    td { "Trained at" }
                    td { (metrics.trained_at.format("%Y-%m-%d %H:%M:%S UTC")) }
                }
            }
        }
    }
}

fn confusion_table(confusion: &[[usize; 2]; 2]) -> Markup {
    html! {
        table {
            thead {
                tr { th { } th { "Predicted 0" } th { "Predicted 1" } }
            }
            tbody {
                tr { th { "Actual 0" } td { (confusion[0][0]) } td { (confusion[0][1]) } }
                tr { th { "Actual 1" } td { (confusion[1][0]) } td { (confusion[1][1]) } }
            }
        }
    }
}

/// Assemble and write the full training report for a ready model.
pub fn write_training_report(
    model: &RiskModel,
    config: &TrainConfig,
    path: &Path,
) -> Result<()> {
    let metrics = model.metrics()?;
    let distributions = model.distributions()?;

    let mut report = Report::new("Cardia Training Report", env!("CARGO_PKG_VERSION"));

    /* Section 1: Evaluation */
    {
        let mut evaluation = ReportSection::new("Evaluation");
        evaluation.add_content(html! {
            p {
                "Held-out performance of the logistic risk model. The test split \
                 is stratified by target label, so both classes appear in it at \
                 their overall rate."
            }
        });
        evaluation.add_content(metrics_table(metrics));
        evaluation.add_content(confusion_table(&metrics.confusion_matrix));
        report.add_section(evaluation);
    }

    /* Section 2: Feature distributions */
    {
        let mut features = ReportSection::new("Feature Distributions");
        features.add_content(html! {
            p {
                "Histograms of the numeric features over the full training \
                 dataset, before standardization."
            }
        });
        for (name, dist) in distributions {
            let plot = plot_distribution(name, dist).map_err(anyhow::Error::msg)?;
            features.add_plot(plot);
        }
        report.add_section(features);
    }

    /* Section 3: Configuration */
    {
        let mut configuration = ReportSection::new("Configuration");
        configuration.add_content(html! {
            style {
                ".code-container {
                    background-color: #f5f5f5;
                    padding: 10px;
                    border-radius: 5px;
                    overflow-x: auto;
                    font-family: monospace;
                    white-space: pre-wrap;
                }"
            }
            div class="code-container" {
                pre {
                    code { (PreEscaped(serde_json::to_string_pretty(&config)?)) }
                }
            }
        });
        report.add_section(configuration);
    }

    report.save_to_file(path)
}
