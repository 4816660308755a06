use h5p_embed_core::ProgressSummary;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ProgressPanelProps {
    pub summary: ProgressSummary,
    pub on_reset: Callback<()>,
    #[prop_or_default]
    pub on_clear_records: Option<Callback<()>>,
}

/// Percentage rounded for display; unknown scores render as a dash
pub fn format_percent(percent: Option<f64>) -> String {
    match percent {
        Some(p) if p.is_finite() => format!("{:.0}%", p),
        _ => "–".to_string(),
    }
}

#[function_component(ProgressPanel)]
pub fn progress_panel(props: &ProgressPanelProps) -> Html {
    let summary = &props.summary;

    let on_reset = {
        let cb = props.on_reset.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };

    html! {
        <div class="h5p-progress">
            <h3 class="h5p-progress__title">{"Your progress"}</h3>
            <dl class="h5p-progress__stats">
                <dt>{"Completed"}</dt>
                <dd>{format!("{} / {}", summary.completed_activities, summary.total_activities)}</dd>
                <dt>{"Completion"}</dt>
                <dd>{format_percent(Some(summary.completion_rate))}</dd>
                <dt>{"Average score"}</dt>
                <dd>{format_percent(Some(summary.average_score_percent))}</dd>
                <dt>{"Last updated"}</dt>
                <dd>{summary.last_updated.format("%Y-%m-%d %H:%M").to_string()}</dd>
            </dl>
            <div class="h5p-progress__actions">
                <button class="h5p-progress__reset" onclick={on_reset}>{"Reset progress"}</button>
                {if let Some(cb) = props.on_clear_records.clone() {
                    let onclick = Callback::from(move |_: MouseEvent| cb.emit(()));
                    html! {
                        <button class="h5p-progress__clear" {onclick}>{"Clear statement log"}</button>
                    }
                } else {
                    html! {}
                }}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(50.0)), "50%");
        assert_eq!(format_percent(Some(66.666)), "67%");
        assert_eq!(format_percent(None), "–");
        assert_eq!(format_percent(Some(f64::NAN)), "–");
    }
}
