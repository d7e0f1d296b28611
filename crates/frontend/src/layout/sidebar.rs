//! Sidebar with the fourteen analyses grouped by topic.

use crate::layout::global_context::AppGlobalContext;
use contracts::dashboards::d100_candy_sales::AnalysisView;
use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct MenuGroup {
    id: &'static str,
    label: &'static str,
    items: Vec<AnalysisView>,
}

fn menu_groups() -> Vec<MenuGroup> {
    vec![
        MenuGroup {
            id: "sales",
            label: "Sales over time",
            items: vec![
                AnalysisView::YearlySales,
                AnalysisView::MonthlyVolume,
                AnalysisView::QuarterlySales,
                AnalysisView::MinMaxSales,
            ],
        },
        MenuGroup {
            id: "growth",
            label: "Growth",
            items: vec![
                AnalysisView::YearlyGrowth,
                AnalysisView::TopGrowthProducts,
                AnalysisView::ChannelGrowth,
            ],
        },
        MenuGroup {
            id: "channels",
            label: "Distribution channels",
            items: vec![
                AnalysisView::ChannelSales,
                AnalysisView::BrandChannelPerformance,
            ],
        },
        MenuGroup {
            id: "manufacturers",
            label: "Manufacturers",
            items: vec![
                AnalysisView::TopManufacturers,
                AnalysisView::ManufacturerSales,
                AnalysisView::TopProductsPerManufacturer,
            ],
        },
        MenuGroup {
            id: "categories",
            label: "Categories & brands",
            items: vec![
                AnalysisView::CategorySales,
                AnalysisView::TopBrandsPerCategory,
            ],
        },
    ]
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = expect_context::<AppGlobalContext>();
    let expanded_groups = RwSignal::new(
        menu_groups()
            .iter()
            .map(|g| g.id.to_string())
            .collect::<Vec<_>>(),
    );

    let toggle_group = move |id: &str| {
        let id = id.to_string();
        expanded_groups.update(|groups| {
            if let Some(pos) = groups.iter().position(|g| *g == id) {
                groups.remove(pos);
            } else {
                groups.push(id);
            }
        });
    };

    view! {
        <aside class=move || {
            if ctx.sidebar_open.get() { "sidebar" } else { "sidebar sidebar--collapsed" }
        }>
            <div class="sidebar__header">
                <span class="sidebar__title">"Candy Sales"</span>
                <button
                    class="sidebar__toggle"
                    on:click=move |_| ctx.sidebar_open.update(|open| *open = !*open)
                >
                    "≡"
                </button>
            </div>
            <nav class="sidebar__nav">
                {menu_groups()
                    .into_iter()
                    .map(|group| {
                        let group_id = group.id;
                        let is_expanded =
                            move || expanded_groups.get().iter().any(|g| g == group_id);
                        view! {
                            <div class="sidebar-group">
                                <div
                                    class="sidebar-group__label"
                                    on:click=move |_| toggle_group(group_id)
                                >
                                    <span class=move || {
                                        if is_expanded() {
                                            "sidebar-group__chevron sidebar-group__chevron--open"
                                        } else {
                                            "sidebar-group__chevron"
                                        }
                                    }>
                                        "\u{25B8}"
                                    </span>
                                    <span>{group.label}</span>
                                </div>
                                <div class=move || {
                                    if is_expanded() {
                                        "sidebar-group__items"
                                    } else {
                                        "sidebar-group__items sidebar-group__items--hidden"
                                    }
                                }>
                                    {group
                                        .items
                                        .into_iter()
                                        .map(|item| {
                                            let id = item.id();
                                            let is_active = move || {
                                                ctx.active.get().as_deref() == Some(id)
                                            };
                                            view! {
                                                <div
                                                    class=move || {
                                                        if is_active() {
                                                            "sidebar-item sidebar-item--active"
                                                        } else {
                                                            "sidebar-item"
                                                        }
                                                    }
                                                    on:click=move |_| ctx.activate(id)
                                                >
                                                    {item.title()}
                                                </div>
                                            }
                                        })
                                        .collect_view()}
                                </div>
                            </div>
                        }
                    })
                    .collect_view()}
            </nav>
        </aside>
    }
}
