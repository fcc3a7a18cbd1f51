use yew::prelude::*;

use crate::cart_context::CartHandle;
use crate::format::format_price;

#[derive(Properties, PartialEq)]
pub struct CartSummaryProps {
    pub cart: CartHandle,
    #[prop_or_default]
    pub on_open_cart: Callback<()>,
}

/// Bottom bar with the running cart total; hidden while the cart is empty.
#[function_component(CartSummary)]
pub fn cart_summary(props: &CartSummaryProps) -> Html {
    let store = &props.cart.store;
    if store.is_empty() {
        return Html::default();
    }

    let discount = store.cart_discount();
    let onclick = {
        let cb = props.on_open_cart.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };

    html! {
        <aside class="cart-summary" role="status" aria-live="polite" data-testid="cart-summary">
            <span class="cart-summary-items">{ format!("{} items", store.total_items()) }</span>
            if discount != 0 {
                <span class="cart-summary-discount">{ format!("Saved {}", format_price(-discount)) }</span>
            }
            <button type="button" class="cart-summary-open" {onclick}>
                { format!("Cart {}", format_price(store.cart_cost())) }
            </button>
        </aside>
    }
}
