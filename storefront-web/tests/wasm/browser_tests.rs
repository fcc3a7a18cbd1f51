use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen_test::*;
use yew_router::history::{BrowserHistory, History};

use storefront_web::anchor::BrowserAnchorNavigator;
use storefront_web::dom;
use storefront_web::layout_probe::DomLayoutProbe;
use storefront_web::storefront::{
    AnchorNavigator, CartCache, CartStore, LayoutProbe, LineItemSignature,
    LocalStorageCartCache, category_block_id, load_catalog,
};

#[wasm_bindgen_test]
fn local_storage_cache_round_trips_cart() {
    let cache = LocalStorageCartCache::with_key("storefront.cart.test");
    let catalog = load_catalog().expect("catalog");
    let cola = catalog.find_product("cola").expect("cola");

    let mut store = CartStore::with_cache(cache.clone());
    store
        .set_quantity(&LineItemSignature::bare("cola"), 2, Some(cola))
        .expect("set quantity");

    let restored = cache.load().expect("load").expect("snapshot stored");
    assert_eq!(&restored, store.cart());

    store.clear();
    let cleared = cache.load().expect("load").expect("snapshot stored");
    assert!(cleared.is_empty());
}

#[wasm_bindgen_test]
fn anchor_navigator_writes_location_hash() {
    let mut navigator = BrowserAnchorNavigator::new("/wa/products");
    navigator.set_anchor("drinks");
    assert_eq!(navigator.current_anchor().as_deref(), Some("#drinks"));
}

#[wasm_bindgen_test]
fn anchor_changes_notify_router_history() {
    let history = BrowserHistory::new();
    let changes = Rc::new(Cell::new(0));
    let _listener = {
        let changes = changes.clone();
        history.listen(move || changes.set(changes.get() + 1))
    };

    let mut navigator = BrowserAnchorNavigator::new("/wa/products");
    navigator.set_anchor("pizza");
    assert_eq!(changes.get(), 1);
    assert_eq!(history.location().hash(), "#pizza");
    assert!(history.location().path().ends_with("/wa/products"));
}

#[wasm_bindgen_test]
fn layout_probe_measures_rendered_blocks() {
    let doc = dom::document();
    let block = doc.create_element("section").expect("create block");
    block.set_id(&category_block_id("probe"));
    block
        .set_attribute("style", "height: 120px")
        .expect("style block");
    doc.body()
        .expect("body")
        .append_child(&block)
        .expect("append block");

    let probe = DomLayoutProbe;
    let rect = probe
        .element_rect(&category_block_id("probe"))
        .expect("block rect");
    assert!((rect.height - 120.0).abs() < 1.0);
    assert!(probe.element_rect("cat-prods-missing").is_none());
    assert!(probe.viewport_height() > 0.0);
    block.remove();
}
