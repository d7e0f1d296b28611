use leptos::prelude::*;

/// Checkbox list over the filter options of one view.
///
/// `None` in `selected` means "everything" (the default); a narrowed or
/// emptied selection materializes into `Some(keys)`. An empty `Some` is
/// a valid state and renders an empty chart.
#[component]
pub fn MultiSelect(
    #[prop(into)] label: String,
    options: Vec<String>,
    selected: RwSignal<Option<Vec<String>>>,
) -> impl IntoView {
    let all_options = StoredValue::new(options.clone());

    let is_checked = move |option: &str| match selected.get() {
        None => true,
        Some(keys) => keys.iter().any(|k| k == option),
    };

    view! {
        <div class="multi-select">
            <div class="multi-select__header">
                <span class="multi-select__label">{label}</span>
                <button
                    class="multi-select__action"
                    on:click=move |_| selected.set(None)
                >
                    "All"
                </button>
                <button
                    class="multi-select__action"
                    on:click=move |_| selected.set(Some(Vec::new()))
                >
                    "None"
                </button>
            </div>
            <div class="multi-select__options">
                {options
                    .into_iter()
                    .map(|option| {
                        let value = option.clone();
                        let checked = move || is_checked(&value);
                        let toggle_value = option.clone();
                        view! {
                            <label class="multi-select__option">
                                <input
                                    type="checkbox"
                                    prop:checked=checked
                                    on:change=move |_| {
                                        selected.set(toggle_key(
                                            selected.get_untracked(),
                                            &all_options.get_value(),
                                            &toggle_value,
                                        ));
                                    }
                                />
                                <span>{option}</span>
                            </label>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

/// Flip one key in the selection. A `None` (= all) selection first
/// materializes into the full option list; a selection that grows back
/// to every option collapses to `None` again.
pub fn toggle_key(
    current: Option<Vec<String>>,
    all: &[String],
    key: &str,
) -> Option<Vec<String>> {
    let mut keys = current.unwrap_or_else(|| all.to_vec());
    if let Some(pos) = keys.iter().position(|k| k == key) {
        keys.remove(pos);
    } else {
        keys.push(key.to_string());
    }
    if keys.len() == all.len() && all.iter().all(|o| keys.iter().any(|k| k == o)) {
        None
    } else {
        Some(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all() -> Vec<String> {
        vec!["2018".to_string(), "2019".to_string(), "2020".to_string()]
    }

    #[test]
    fn test_toggle_from_full_selection() {
        let next = toggle_key(None, &all(), "2019");
        assert_eq!(next, Some(vec!["2018".to_string(), "2020".to_string()]));
    }

    #[test]
    fn test_toggle_back_to_full_collapses_to_none() {
        let narrowed = Some(vec!["2018".to_string(), "2020".to_string()]);
        assert_eq!(toggle_key(narrowed, &all(), "2019"), None);
    }

    #[test]
    fn test_toggle_last_key_leaves_empty_selection() {
        let one = Some(vec!["2018".to_string()]);
        assert_eq!(toggle_key(one, &all(), "2018"), Some(vec![]));
    }
}
