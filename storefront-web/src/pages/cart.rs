use std::rc::Rc;

use storefront_core::{CartItemInfo, LineItemSignature};
use yew::prelude::*;

use crate::cart_context::{CartCommand, CartHandle};
use crate::format::format_price;

#[derive(Properties, PartialEq)]
pub struct CartPageProps {
    pub cart: CartHandle,
    pub on_back: Callback<()>,
}

/// Display names of a line's additions, sub-products first.
#[must_use]
pub fn addition_names(cart: &CartHandle, signature: &str) -> Vec<String> {
    match cart.store.line_additions(signature) {
        Ok(resolved) => resolved
            .sub_products
            .values()
            .map(|sub| sub.name.clone())
            .chain(resolved.options.values().map(|opt| opt.name.clone()))
            .collect(),
        Err(err) => {
            log::warn!("Cannot resolve additions of {signature}: {err}");
            Vec::new()
        }
    }
}

fn render_line(cart: &CartHandle, key: &str, line: &CartItemInfo) -> Html {
    let Ok(signature) = LineItemSignature::decode(key) else {
        return Html::default();
    };
    let set_count = cart.count_setter(Rc::new(line.product.clone()), signature);
    let count = line.count;
    let on_dec = {
        let set_count = set_count.clone();
        Callback::from(move |_: MouseEvent| set_count.emit(count.saturating_sub(1)))
    };
    let on_inc = Callback::from(move |_: MouseEvent| set_count.emit(count.saturating_add(1)));
    let additions = addition_names(cart, key);
    let line_total = i64::from(count) * line.discounted_unit_price_cents;

    html! {
        <li key={key.to_string()} class="cart-line">
            <div class="cart-line-title">
                <span class="cart-line-name">{ line.product.name.clone() }</span>
                if !additions.is_empty() {
                    <span class="cart-line-additions">{ additions.join(", ") }</span>
                }
            </div>
            <div class="cart-line-count" role="group">
                <button type="button" onclick={on_dec} aria-label="Remove one">{ "−" }</button>
                <span>{ count }</span>
                <button type="button" onclick={on_inc} aria-label="Add one">{ "+" }</button>
            </div>
            <span class="cart-line-total">{ format_price(line_total) }</span>
        </li>
    }
}

#[function_component(CartPage)]
pub fn cart_page(props: &CartPageProps) -> Html {
    let store = &props.cart.store;
    let on_back = {
        let cb = props.on_back.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let on_clear = {
        let on_command = props.cart.on_command.clone();
        Callback::from(move |_: MouseEvent| on_command.emit(CartCommand::Clear))
    };
    let discount = store.cart_discount();

    html! {
        <main class="cart-page" data-testid="cart-page">
            <header class="cart-header">
                <button type="button" class="cart-back" onclick={on_back}>{ "Back to the menu" }</button>
                <h1>{ "Cart" }</h1>
            </header>
            if store.is_empty() {
                <p class="cart-empty">{ "Your cart is empty." }</p>
            } else {
                <ul class="cart-lines">
                    { for store.lines().map(|(key, line)| render_line(&props.cart, key, line)) }
                </ul>
                <dl class="cart-totals">
                    if discount != 0 {
                        <dt>{ "Discount" }</dt>
                        <dd class="cart-discount">{ format_price(discount) }</dd>
                    }
                    <dt>{ "Total" }</dt>
                    <dd class="cart-cost">{ format_price(store.cart_cost()) }</dd>
                </dl>
                <button type="button" class="cart-clear" onclick={on_clear}>{ "Clear cart" }</button>
            }
        </main>
    }
}
