use crate::dashboards::d100_candy_sales::api;
use crate::shared::components::chart_view::ChartView;
use crate::shared::components::data_table::DataTable;
use crate::shared::components::filter_panel::FilterPanel;
use crate::shared::components::multi_select::MultiSelect;
use contracts::dashboards::d100_candy_sales::{ViewDataResponse, ViewDescriptor};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// One analysis page: optional filter panel, the chart, and the data
/// disclosure(s) below it. Recreated on every view switch, so the
/// filter selection always starts fresh.
#[component]
pub fn AnalysisDashboard(descriptor: ViewDescriptor) -> impl IntoView {
    let view_id = StoredValue::new(descriptor.id.clone());
    let filter = descriptor.filter.clone();

    // Data state
    let (data, set_data) = signal(None::<ViewDataResponse>);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);

    // `None` = every option selected (the parameter stays off the wire)
    let selected = RwSignal::new(None::<Vec<String>>);
    let filter_expanded = RwSignal::new(true);

    // Reload whenever the selection changes
    Effect::new(move |_| {
        let selection = selected.get();
        set_loading.set(true);
        set_error.set(None);
        let id = view_id.get_value();
        spawn_local(async move {
            match api::get_view_data(&id, selection.as_deref()).await {
                Ok(response) => {
                    set_data.set(Some(response));
                    set_loading.set(false);
                }
                Err(e) => {
                    set_error.set(Some(e));
                    set_loading.set(false);
                }
            }
        });
    });

    let narrowed_count = Signal::derive(move || {
        selected.get().map(|keys| keys.len()).unwrap_or(0)
    });

    view! {
        <div class="dashboard">
            <h2 class="dashboard__title">{descriptor.title.clone()}</h2>

            {filter.map(|f| {
                let label = f.label.clone();
                let options = f.options.clone();
                view! {
                    <FilterPanel
                        is_expanded=filter_expanded
                        active_filters_count=narrowed_count
                    >
                        <MultiSelect
                            label=label.clone()
                            options=options.clone()
                            selected=selected
                        />
                    </FilterPanel>
                }
            })}

            {move || {
                if loading.get() {
                    view! {
                        <div class="dashboard__loading">
                            <span>"Loading data..."</span>
                        </div>
                    }
                    .into_any()
                } else {
                    view! { <></> }.into_any()
                }
            }}

            {move || {
                error.get().map(|e| {
                    view! {
                        <div class="dashboard__error">
                            <span>{format!("Failed to load view: {}", e)}</span>
                        </div>
                    }
                })
            }}

            {move || {
                data.get().map(|d| {
                    view! {
                        <div class="dashboard__chart">
                            <ChartView spec=d.chart.clone() table=d.table.clone() />
                        </div>
                        <details class="dashboard__details">
                            <summary>"View data"</summary>
                            <DataTable table=d.table.clone() />
                        </details>
                        {d.extra_table.clone().map(|raw| {
                            view! {
                                <details class="dashboard__details">
                                    <summary>"Source rows"</summary>
                                    <DataTable table=raw />
                                </details>
                            }
                        })}
                    }
                })
            }}
        </div>
    }
}
