//! Scroll-driven catalog page.
//!
//! Hosts a [`WindowManager`]: renders the mounted categories, forwards their
//! load reports, and after each render lets the manager settle and carries
//! out its effects (see `host`).

mod host;

use std::cell::RefCell;
use std::rc::Rc;

use storefront_core::constants::ANON_CATEGORY_ID;
use storefront_core::{
    AnchorNavigator, Catalog, Category, NavigationBridge, StorefrontConfig, WindowManager,
};
use yew::prelude::*;

use crate::cart_context::CartHandle;
use crate::components::cart_summary::CartSummary;
use crate::components::category_block::CategoryBlock;
use crate::components::compact_categories::CompactCategories;

#[derive(Properties, PartialEq)]
pub struct ProductsPageProps {
    pub catalog: Rc<Catalog>,
    pub config: Rc<StorefrontConfig>,
    pub cart: CartHandle,
    /// Location anchor at mount, `#id` or `id`.
    #[prop_or_default]
    pub anchor: Option<AttrValue>,
    /// Receives the category id whenever the picker selects a category.
    #[prop_or_default]
    pub on_anchor_change: Callback<String>,
    #[prop_or_default]
    pub on_open_cart: Callback<()>,
}

/// Anchor navigator that remembers the anchor and reports changes upward.
pub struct CallbackNavigator {
    anchor: Option<String>,
    on_change: Callback<String>,
}

impl CallbackNavigator {
    #[must_use]
    pub const fn new(anchor: Option<String>, on_change: Callback<String>) -> Self {
        Self { anchor, on_change }
    }
}

impl AnchorNavigator for CallbackNavigator {
    fn current_anchor(&self) -> Option<String> {
        self.anchor.clone()
    }

    fn set_anchor(&mut self, anchor: &str) {
        self.anchor = Some(anchor.to_string());
        self.on_change.emit(anchor.to_string());
    }
}

/// Per-page session state: the category window and the picker bridge.
pub struct PageSession {
    pub window: WindowManager,
    pub bridge: NavigationBridge<CallbackNavigator>,
}

impl PageSession {
    #[must_use]
    pub fn new(
        catalog: &Catalog,
        config: &StorefrontConfig,
        anchor: Option<&str>,
        on_anchor_change: Callback<String>,
    ) -> Self {
        let bridge = NavigationBridge::new(CallbackNavigator::new(
            anchor.map(str::to_string),
            on_anchor_change,
        ));
        let category_ids = catalog.category_ids();
        let selected = bridge.initial_index(&category_ids);
        Self {
            window: WindowManager::new(category_ids, selected, config.clone()),
            bridge,
        }
    }

    /// Forward a picker selection. Returns whether a redraw is needed.
    pub fn select(&mut self, idx: usize) -> bool {
        self.bridge.select_category(&mut self.window, idx)
    }
}

pub type SessionRef = Rc<RefCell<PageSession>>;

/// Categories currently mounted by the window.
#[must_use]
pub fn visible_categories(catalog: &Catalog, window: &WindowManager) -> Vec<Rc<Category>> {
    catalog
        .categories
        .get(window.visible_range())
        .unwrap_or_default()
        .iter()
        .map(|category| Rc::new(category.clone()))
        .collect()
}

/// Nameless block above the picker in the compact layout.
#[must_use]
pub fn lead_category() -> Category {
    Category {
        id: ANON_CATEGORY_ID.to_string(),
        name: String::new(),
        photos: Vec::new(),
        products: Vec::new(),
    }
}

/// Page offset whose category counts as "current" for the picker highlight.
#[must_use]
pub fn reading_line(scroll_position: f64, config: &StorefrontConfig) -> f64 {
    scroll_position + config.header_height_px
}

#[function_component(ProductsPage)]
pub fn products_page(props: &ProductsPageProps) -> Html {
    let session: SessionRef = {
        let catalog = props.catalog.clone();
        let config = props.config.clone();
        let anchor = props.anchor.clone();
        let on_anchor_change = props.on_anchor_change.clone();
        use_mut_ref(move || {
            PageSession::new(&catalog, &config, anchor.as_deref(), on_anchor_change)
        })
    };
    let redraw = use_force_update();
    let active = use_state_eq(|| None::<AttrValue>);

    host::use_window_effects(session.clone(), redraw.clone(), active.clone(), props.config.clone());

    let on_load_state_change = {
        let session = session.clone();
        let redraw = redraw.clone();
        Callback::from(move |(category_id, is_loaded): (String, bool)| {
            let advanced = session
                .borrow_mut()
                .window
                .report_load_state(&category_id, is_loaded);
            if advanced {
                redraw.force_update();
            }
        })
    };

    let on_select = {
        let session = session.clone();
        let redraw = redraw.clone();
        Callback::from(move |idx: usize| {
            let changed = session.borrow_mut().select(idx);
            if changed {
                redraw.force_update();
            }
        })
    };

    let blocks = visible_categories(&props.catalog, &session.borrow().window);
    let categories = Rc::new(props.catalog.categories.clone());

    html! {
        <main id="prods-screen" class="prods-screen" data-testid="products-page">
            if props.config.compact_layout {
                <header id="prods-header--search" class="prods-header">
                    <h1 class="prods-title">{ "Menu" }</h1>
                </header>
                <CategoryBlock
                    key={ANON_CATEGORY_ID}
                    category={Rc::new(lead_category())}
                    cart={props.cart.clone()}
                    on_load_state_change={on_load_state_change.clone()}
                />
                <CompactCategories {categories} active={(*active).clone()} {on_select} />
            }
            { for blocks.into_iter().map(|category| html! {
                <CategoryBlock
                    key={category.id.clone()}
                    {category}
                    cart={props.cart.clone()}
                    on_load_state_change={on_load_state_change.clone()}
                />
            }) }
            <CartSummary cart={props.cart.clone()} on_open_cart={props.on_open_cart.clone()} />
        </main>
    }
}
