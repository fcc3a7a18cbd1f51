#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use storefront_core::AnchorNavigator;
#[cfg(target_arch = "wasm32")]
use yew::prelude::*;
#[cfg(target_arch = "wasm32")]
use yew_router::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::anchor::BrowserAnchorNavigator;
#[cfg(target_arch = "wasm32")]
use crate::cart_context::use_cart;
#[cfg(target_arch = "wasm32")]
use crate::pages::{cart::CartPage, not_found::NotFound, products::ProductsPage};
#[cfg(target_arch = "wasm32")]
use crate::router::Route;

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    let router_base = crate::paths::router_base().map(AttrValue::from);
    html! {
        <BrowserRouter basename={router_base}>
            <AppInner />
        </BrowserRouter>
    }
}

#[cfg(target_arch = "wasm32")]
#[function_component(AppInner)]
fn app_inner() -> Html {
    let catalog = use_memo((), |()| crate::storefront::load_catalog().map(Rc::new));
    let config = use_memo((), |()| crate::storefront::bundled_config());
    let cart = use_cart();
    let navigator = use_navigator();

    let catalog = match &*catalog {
        Ok(catalog) => catalog.clone(),
        Err(err) => {
            log::error!("Storefront unavailable: {err:#}");
            return html! {
                <section class="panel load-error" role="alert">
                    <h1>{ "The menu could not be loaded" }</h1>
                </section>
            };
        }
    };

    let go = |route: Route| {
        let navigator = navigator.clone();
        Callback::from(move |()| {
            if let Some(navigator) = &navigator {
                navigator.push(&route);
            }
        })
    };
    let on_open_cart = go(Route::Cart);
    let on_back = go(Route::Products);
    let on_go_home = go(Route::Products);

    let products_path = config.products_path.clone();
    let on_anchor_change = Callback::from(move |category_id: String| {
        BrowserAnchorNavigator::new(products_path.clone()).set_anchor(&category_id);
    });
    let anchor = BrowserAnchorNavigator::new(config.products_path.clone())
        .current_anchor()
        .map(AttrValue::from);

    let render = move |route: Route| match route {
        Route::Home => html! { <Redirect<Route> to={Route::Products} /> },
        Route::Products => html! {
            <ProductsPage
                catalog={catalog.clone()}
                config={config.clone()}
                cart={cart.clone()}
                anchor={anchor.clone()}
                on_anchor_change={on_anchor_change.clone()}
                on_open_cart={on_open_cart.clone()}
            />
        },
        Route::Cart => html! { <CartPage cart={cart.clone()} on_back={on_back.clone()} /> },
        Route::NotFound => html! { <NotFound on_go_home={on_go_home.clone()} /> },
    };

    html! { <Switch<Route> {render} /> }
}
