//! Browser side of the products page: scroll listener, post-render settle,
//! remeasure timers and scroll animation.

use std::rc::Rc;

use storefront_core::StorefrontConfig;
use yew::prelude::*;

use super::SessionRef;

#[cfg(target_arch = "wasm32")]
#[hook]
pub fn use_window_effects(
    session: SessionRef,
    redraw: UseForceUpdateHandle,
    active: UseStateHandle<Option<AttrValue>>,
    config: Rc<StorefrontConfig>,
) {
    {
        let session = session.clone();
        let redraw = redraw.clone();
        let active = active.clone();
        use_effect(move || {
            wasm::after_render(&session, &redraw, &active);
            || ()
        });
    }

    use_effect_with((), move |()| {
        let listener = wasm::ScrollListener::attach(session, redraw, active, config);
        move || drop(listener)
    });
}

/// Layout effects need a live DOM; server rendering skips them.
#[cfg(not(target_arch = "wasm32"))]
#[hook]
pub fn use_window_effects(
    _session: SessionRef,
    _redraw: UseForceUpdateHandle,
    _active: UseStateHandle<Option<AttrValue>>,
    _config: Rc<StorefrontConfig>,
) {
}

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::rc::Rc;

    use storefront_core::{LayoutProbe, StorefrontConfig, WindowEffect};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use yew::prelude::*;

    use super::super::{SessionRef, reading_line};
    use crate::dom;
    use crate::easing::Easing;
    use crate::layout_probe::DomLayoutProbe;

    /// Re-check growth, then settle the window if its revision moved.
    pub fn after_render(
        session: &SessionRef,
        redraw: &UseForceUpdateHandle,
        active: &UseStateHandle<Option<AttrValue>>,
    ) {
        let probe = DomLayoutProbe;
        let (grew, effects) = {
            let mut current = session.borrow_mut();
            if current.window.check_growth(&probe) {
                (true, Vec::new())
            } else if current.window.needs_settle() {
                (false, current.window.settle(&probe))
            } else {
                (false, Vec::new())
            }
        };

        for effect in effects {
            run_effect(effect, session, active);
        }
        if grew {
            redraw.force_update();
        }
    }

    fn run_effect(
        effect: WindowEffect,
        session: &SessionRef,
        active: &UseStateHandle<Option<AttrValue>>,
    ) {
        match effect {
            WindowEffect::ScheduleRemeasure { delay_ms, revision } => {
                let session = session.clone();
                let active = active.clone();
                let scheduled = dom::set_timeout(delay_ms, move || {
                    log::debug!("re-measuring offsets for revision {revision}");
                    session
                        .borrow_mut()
                        .window
                        .remeasure_offsets(&DomLayoutProbe);
                    let config = session.borrow().window.config().clone();
                    update_active(&session, &active, &config);
                });
                if let Err(err) = scheduled {
                    dom::console_error(&dom::js_error_message(&err));
                }
            }
            WindowEffect::ScrollTo {
                top,
                duration_ms,
                easing,
            } => {
                if let Err(err) = dom::animate_scroll_to(top, duration_ms, Easing::from_name(&easing))
                {
                    dom::console_error(&dom::js_error_message(&err));
                }
            }
        }
    }

    fn update_active(
        session: &SessionRef,
        active: &UseStateHandle<Option<AttrValue>>,
        config: &StorefrontConfig,
    ) {
        let line = reading_line(DomLayoutProbe.scroll_position(), config);
        let current = session.borrow();
        let window = &current.window;
        let next = window
            .offsets()
            .active_category(window.category_ids(), line)
            .map(|id| AttrValue::from(id.to_string()));
        active.set(next);
    }

    /// `scroll` listener on the window, removed on drop.
    pub struct ScrollListener {
        callback: Closure<dyn FnMut(web_sys::Event)>,
    }

    impl ScrollListener {
        pub fn attach(
            session: SessionRef,
            redraw: UseForceUpdateHandle,
            active: UseStateHandle<Option<AttrValue>>,
            config: Rc<StorefrontConfig>,
        ) -> Self {
            let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event| {
                let grew = session.borrow_mut().window.check_growth(&DomLayoutProbe);
                if grew {
                    redraw.force_update();
                }
                update_active(&session, &active, &config);
            });
            if let Err(err) = dom::window()
                .add_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref())
            {
                dom::console_error(&dom::js_error_message(&err));
            }
            Self { callback }
        }
    }

    impl Drop for ScrollListener {
        fn drop(&mut self) {
            let _ = dom::window().remove_event_listener_with_callback(
                "scroll",
                self.callback.as_ref().unchecked_ref(),
            );
        }
    }
}
