use std::rc::Rc;

use storefront_core::pricing::product_price;
use storefront_core::{Additions, LineItemSignature, Product};
use yew::prelude::*;

use crate::cart_context::CartHandle;
use crate::format::format_price;
use crate::paths::photo_url;

#[derive(Properties, PartialEq)]
pub struct ProductCardProps {
    pub product: Rc<Product>,
    pub cart: CartHandle,
    /// Fired once the card photo has loaded or failed.
    #[prop_or_default]
    pub on_media_settled: Callback<()>,
}

/// Toggle a single-quantity addition on or off.
#[must_use]
pub fn toggled(additions: &Additions, addition_id: &str) -> Additions {
    let mut next = additions.clone();
    if next.remove(addition_id).is_none() {
        next.insert(addition_id.to_string(), 1);
    }
    next
}

#[function_component(ProductCard)]
pub fn product_card(props: &ProductCardProps) -> Html {
    let additions = use_state(Additions::new);
    let product = props.product.clone();

    let signature = LineItemSignature::new(product.id.clone(), (*additions).clone());
    let count = props.cart.count(&signature);
    let set_count = props.cart.count_setter(product.clone(), signature);
    let prices = product_price(&product, 1, &additions);

    let on_add = {
        let set_count = set_count.clone();
        Callback::from(move |_: MouseEvent| set_count.emit(count.saturating_add(1)))
    };
    let on_remove = Callback::from(move |_: MouseEvent| set_count.emit(count.saturating_sub(1)));

    let addition_row = |id: &str, name: &str, price_cents: i64| {
        let checked = additions.contains_key(id);
        let onchange = {
            let additions = additions.clone();
            let id = id.to_string();
            Callback::from(move |_: Event| additions.set(toggled(&additions, &id)))
        };
        html! {
            <li key={id.to_string()}>
                <label class="prod-addition">
                    <input type="checkbox" {checked} {onchange} />
                    <span>{ name.to_string() }</span>
                    if price_cents > 0 {
                        <span class="prod-addition-price">{ format!("+{}", format_price(price_cents)) }</span>
                    }
                </label>
            </li>
        }
    };

    let photo = product.photos.first().map(|photo| {
        let settled = {
            let cb = props.on_media_settled.clone();
            Callback::from(move |_: Event| cb.emit(()))
        };
        // Loaded eagerly; the category block waits for every photo to settle.
        html! {
            <img class="prod-photo" src={photo_url(photo)} alt={product.name.clone()}
                 onload={settled.clone()} onerror={settled} />
        }
    });

    html! {
        <article class="prod-card" data-product-id={product.id.clone()}>
            { photo.unwrap_or_default() }
            <h3 class="prod-name">{ product.name.clone() }</h3>
            if !product.desc.is_empty() {
                <p class="prod-desc">{ product.desc.clone() }</p>
            }
            if !product.sub_products.is_empty() || !product.options.is_empty() {
                <ul class="prod-additions">
                    { for product.sub_products.iter().map(|sub| addition_row(&sub.id, &sub.name, sub.price_cents)) }
                    { for product.options.iter().map(|opt| addition_row(&opt.id, &opt.name, opt.price_cents)) }
                </ul>
            }
            <div class="prod-price">
                if prices.discounted_cents < prices.price_cents {
                    <s class="prod-price-regular">{ format_price(prices.price_cents) }</s>
                }
                <span class="prod-price-current">{ format_price(prices.discounted_cents) }</span>
            </div>
            <div class="prod-count" role="group" aria-label={format!("Quantity of {}", product.name)}>
                if count > 0 {
                    <button type="button" class="prod-count-dec" onclick={on_remove} aria-label="Remove one">{ "−" }</button>
                    <span class="prod-count-value" aria-live="polite">{ count }</span>
                }
                <button type="button" class="prod-count-inc" onclick={on_add} aria-label="Add one">{ "+" }</button>
            </div>
        </article>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_adds_then_removes() {
        let on = toggled(&Additions::new(), "cheese");
        assert_eq!(on.get("cheese"), Some(&1));
        let off = toggled(&on, "cheese");
        assert!(off.is_empty());
    }
}
