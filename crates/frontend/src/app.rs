use crate::dashboards::d100_candy_sales::api;
use crate::dashboards::d100_candy_sales::ui::AnalysisDashboard;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::sidebar::Sidebar;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn App() -> impl IntoView {
    // Provide the AppGlobalContext store to the whole app via context.
    let ctx = AppGlobalContext::new();
    provide_context(ctx);

    // Load the view catalog once; the first view becomes active.
    Effect::new(move |_| {
        spawn_local(async move {
            match api::get_views().await {
                Ok(views) => {
                    if ctx.active.get_untracked().is_none() {
                        if let Some(first) = views.first() {
                            ctx.active.set(Some(first.id.clone()));
                        }
                    }
                    ctx.views.set(views);
                }
                Err(err) => {
                    log::error!("Failed to load view catalog: {}", err);
                }
            }
        });
    });

    view! {
        <div class="app-shell">
            <Sidebar />
            <main class="app-main">
                {move || {
                    match ctx.active_view() {
                        // keyed on the id so a view switch rebuilds the
                        // dashboard and resets its filter selection
                        Some(descriptor) => {
                            view! { <AnalysisDashboard descriptor=descriptor /> }.into_any()
                        }
                        None => view! {
                            <div class="app-main__empty">
                                <span>"Loading analyses..."</span>
                            </div>
                        }
                        .into_any(),
                    }
                }}
            </main>
        </div>
    }
}
