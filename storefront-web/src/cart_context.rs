//! Cart state shared by the catalog and cart pages.

use std::rc::Rc;

use storefront_core::{CartCache, CartError, CartStore, LineItemSignature, Product};
use yew::prelude::*;

use crate::storefront::WebCartStore;

/// A cart mutation requested by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum CartCommand {
    SetCount {
        signature: LineItemSignature,
        product: Rc<Product>,
        count: u32,
    },
    Remove(String),
    Clear,
}

/// Apply a command to the store.
///
/// # Errors
///
/// Propagates cart contract violations from the store.
pub fn apply_cart_command<C: CartCache>(
    store: &mut CartStore<C>,
    command: CartCommand,
) -> Result<(), CartError> {
    match command {
        CartCommand::SetCount {
            signature,
            product,
            count,
        } => store
            .set_quantity(&signature, count, Some(product.as_ref()))
            .map(|_| ()),
        CartCommand::Remove(product_id) => store.remove(&product_id).map(|_| ()),
        CartCommand::Clear => {
            store.clear();
            Ok(())
        }
    }
}

/// Read access to the cart plus a command sink, passed down as a prop.
#[derive(Clone, PartialEq)]
pub struct CartHandle {
    pub store: Rc<WebCartStore>,
    pub on_command: Callback<CartCommand>,
}

impl CartHandle {
    #[must_use]
    pub fn new(store: WebCartStore, on_command: Callback<CartCommand>) -> Self {
        Self {
            store: Rc::new(store),
            on_command,
        }
    }

    /// Count of the line built from `product` and `signature`.
    #[must_use]
    pub fn count(&self, signature: &LineItemSignature) -> u32 {
        self.store.count(signature)
    }

    /// Callback that sets the count of one specific line.
    #[must_use]
    pub fn count_setter(&self, product: Rc<Product>, signature: LineItemSignature) -> Callback<u32> {
        let on_command = self.on_command.clone();
        Callback::from(move |count| {
            on_command.emit(CartCommand::SetCount {
                signature: signature.clone(),
                product: product.clone(),
                count,
            });
        })
    }
}

/// Reducer state behind [`use_cart`]. Commands queued before a re-render
/// each apply to the store left by the previous one.
#[derive(Clone, PartialEq)]
pub struct CartState(pub WebCartStore);

impl Reducible for CartState {
    type Action = CartCommand;

    fn reduce(self: Rc<Self>, command: CartCommand) -> Rc<Self> {
        let mut next = self.0.clone();
        match apply_cart_command(&mut next, command) {
            Ok(()) => Rc::new(Self(next)),
            Err(err) => {
                log::error!("Rejected cart update: {err}");
                self
            }
        }
    }
}

/// Cart state hook: restores from `localStorage` and applies commands,
/// logging contract violations instead of panicking the UI.
#[hook]
pub fn use_cart() -> CartHandle {
    let state = use_reducer(|| CartState(crate::storefront::restore_web_cart()));
    let on_command = {
        let dispatcher = state.dispatcher();
        Callback::from(move |command: CartCommand| dispatcher.dispatch(command))
    };
    CartHandle {
        store: Rc::new(state.0.clone()),
        on_command,
    }
}
