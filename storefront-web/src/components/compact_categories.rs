use std::rc::Rc;

use storefront_core::Category;
use yew::prelude::*;

/// Sticky category picker shown in the compact layout.
#[derive(Properties, PartialEq)]
pub struct CompactCategoriesProps {
    pub categories: Rc<Vec<Category>>,
    /// Category currently under the header, if offsets are known.
    #[prop_or_default]
    pub active: Option<AttrValue>,
    pub on_select: Callback<usize>,
}

#[function_component(CompactCategories)]
pub fn compact_categories(props: &CompactCategoriesProps) -> Html {
    let tabs = props.categories.iter().enumerate().map(|(idx, category)| {
        let is_active = props.active.as_deref() == Some(category.id.as_str());
        let onclick = {
            let on_select = props.on_select.clone();
            Callback::from(move |_: MouseEvent| on_select.emit(idx))
        };
        html! {
            <li key={category.id.clone()}>
                <button
                    type="button"
                    class={classes!("cat-tab", is_active.then_some("active"))}
                    aria-current={is_active.then_some("true")}
                    data-category-id={category.id.clone()}
                    {onclick}
                >
                    { category.name.clone() }
                </button>
            </li>
        }
    });

    html! {
        <nav id="prods-header--cats" class="compact-cats" aria-label="Categories">
            <ul>{ for tabs }</ul>
        </nav>
    }
}
