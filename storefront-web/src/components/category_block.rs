//! One category of the catalog window.
//!
//! The block reports itself as loading until every product photo has loaded
//! or failed; until then its height is not final and the window must not grow
//! past it.

use std::rc::Rc;

use storefront_core::{Category, category_block_id};
use yew::prelude::*;

use crate::cart_context::CartHandle;
use crate::components::product_card::ProductCard;

#[derive(Properties, PartialEq)]
pub struct CategoryBlockProps {
    pub category: Rc<Category>,
    pub cart: CartHandle,
    /// `(category_id, is_loaded)`
    pub on_load_state_change: Callback<(String, bool)>,
}

/// Photos a category has to wait for.
#[must_use]
pub fn pending_media(category: &Category) -> usize {
    category
        .products
        .iter()
        .filter(|product| !product.photos.is_empty())
        .count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingMedia(usize);

impl Reducible for PendingMedia {
    type Action = ();

    fn reduce(self: Rc<Self>, (): ()) -> Rc<Self> {
        Rc::new(Self(self.0.saturating_sub(1)))
    }
}

#[function_component(CategoryBlock)]
pub fn category_block(props: &CategoryBlockProps) -> Html {
    let category = props.category.clone();
    let pending = use_reducer(|| PendingMedia(pending_media(&category)));

    {
        let on_load = props.on_load_state_change.clone();
        let id = category.id.clone();
        use_effect_with(pending.0, move |remaining| {
            on_load.emit((id, *remaining == 0));
            || ()
        });
    }

    let on_media_settled = {
        let pending = pending.clone();
        Callback::from(move |()| pending.dispatch(()))
    };

    let heading_id = format!("{}-title", category_block_id(&category.id));
    html! {
        <section id={category_block_id(&category.id)} class="cat-prods" aria-labelledby={heading_id.clone()}>
            if !category.name.is_empty() {
                <h2 id={heading_id} class="cat-heading">{ category.name.clone() }</h2>
            }
            <div class="prod-grid">
                { for category.products.iter().map(|product| html! {
                    <ProductCard
                        key={product.id.clone()}
                        product={Rc::new(product.clone())}
                        cart={props.cart.clone()}
                        on_media_settled={on_media_settled.clone()}
                    />
                }) }
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::Product;

    #[test]
    fn only_products_with_photos_are_awaited() {
        let with_photo = Product {
            id: String::from("a"),
            name: String::from("A"),
            desc: String::new(),
            price_cents: 100,
            discount_pct: 0.0,
            sub_products: Vec::new(),
            options: Vec::new(),
            photos: vec![String::from("a.jpg"), String::from("a2.jpg")],
        };
        let without = Product {
            id: String::from("b"),
            photos: Vec::new(),
            ..with_photo.clone()
        };
        let category = Category {
            id: String::from("c"),
            name: String::from("C"),
            photos: Vec::new(),
            products: vec![with_photo, without],
        };
        assert_eq!(pending_media(&category), 1);
    }
}
