// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A TV home screen driven by arrow keys.
//!
//! The scene has a vertical menu on the left and a 3×2 grid of tiles. The
//! grid remembers its last focused tile, leaving it to the left lands in the
//! menu, and the menu blocks moving up. Listeners log every transfer and veto
//! focus on a locked tile.
//!
//! Run:
//! - `cargo run -p sightline_demos --example remote_grid`
//! - `RUST_LOG=sightline=debug cargo run -p sightline_demos --example remote_grid`

use kurbo::Rect;
use sightline::adapters::memory::{ElementId, MemoryHost};
use sightline::{
    ConfigPatch, Direction, EventKind, ExtSelector, Host, KeyMap, Modifiers, NavEvent, Outcome,
    SpatialNavigator,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LEFT: u32 = 37;
const UP: u32 = 38;
const RIGHT: u32 = 39;
const DOWN: u32 = 40;
const ENTER: u32 = 13;

fn build_scene(host: &mut MemoryHost) -> (Vec<ElementId>, Vec<ElementId>) {
    let menu = ["Home", "Movies", "Settings"]
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let y = 100.0 + 80.0 * i as f64;
            host.element("li")
                .class("menu-item")
                .attr("aria-label", label)
                .rect(Rect::new(40.0, y, 240.0, y + 60.0))
                .build()
        })
        .collect();

    let mut tiles = Vec::new();
    for row in 0..2 {
        for col in 0..3 {
            let x = 320.0 + 420.0 * f64::from(col);
            let y = 100.0 + 300.0 * f64::from(row);
            let mut tile = host
                .element("div")
                .class("tile")
                .attr("aria-label", &format!("Tile {row}-{col}"))
                .rect(Rect::new(x, y, x + 380.0, y + 260.0));
            if row == 1 && col == 2 {
                tile = tile.attr("data-locked", "true");
            }
            tiles.push(tile.build());
        }
    }
    (menu, tiles)
}

fn label(nav: &SpatialNavigator<MemoryHost>, element: ElementId) -> String {
    nav.host()
        .attribute(element, "aria-label")
        .unwrap_or_else(|| format!("{element:?}"))
}

fn press(nav: &mut SpatialNavigator<MemoryHost>, name: &str, code: u32) {
    let response = nav.on_key_down(code, Modifiers::empty());
    nav.on_key_up(code, Modifiers::empty());
    let focused = nav
        .host()
        .active_element()
        .map(|e| label(nav, e))
        .unwrap_or_else(|| "nothing".into());
    info!(key = name, handled = response.is_handled(), %focused, "key pressed");
}

fn main() -> Result<(), sightline::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut host = MemoryHost::new();
    let (menu, _tiles) = build_scene(&mut host);

    let mut nav = SpatialNavigator::new(host);
    nav.init(None);
    nav.add_with_id(
        "menu",
        ConfigPatch::from_json(r#"{ "selector": ".menu-item", "leaveFor": { "up": "" } }"#)?,
    )?;
    nav.add_with_id(
        "grid",
        ConfigPatch::from_json(
            r#"{ "selector": ".tile", "enterTo": "last-focused", "leaveFor": { "left": "@menu" } }"#,
        )?,
    )?;
    nav.set_default_section(Some("grid"))?;
    nav.make_focusable(None)?;

    // Also accept the numeric keypad arrows.
    nav.set_key_map(
        KeyMap::default()
            .bind(100, Direction::Left)
            .bind(104, Direction::Up)
            .bind(102, Direction::Right)
            .bind(98, Direction::Down),
    );

    nav.on(EventKind::WillFocus, |nav, event| {
        if let NavEvent::WillFocus { target, .. } = event
            && nav.host().has_attribute(*target, "data-locked")
        {
            info!(tile = %label(nav, *target), "locked tile, focus vetoed");
            return Outcome::Cancel;
        }
        Outcome::Proceed
    });
    nav.on(EventKind::Focused, |nav, event| {
        if let NavEvent::Focused { target, detail } = event {
            info!(
                element = %label(nav, *target),
                section = %detail.section_id,
                direction = ?detail.direction,
                "focused"
            );
        }
        Outcome::Proceed
    });
    nav.on(EventKind::NavigateFailed, |nav, event| {
        if let NavEvent::NavigateFailed { target, direction } = event {
            info!(from = %label(nav, *target), %direction, "nowhere to go");
        }
        Outcome::Proceed
    });
    nav.on(EventKind::EnterUp, |nav, event| {
        info!(element = %label(nav, event.target()), "activated");
        Outcome::Cancel
    });

    nav.focus(None);
    press(&mut nav, "right", RIGHT);
    press(&mut nav, "down", DOWN);
    press(&mut nav, "right", RIGHT);
    press(&mut nav, "left", LEFT);
    press(&mut nav, "left", LEFT);
    press(&mut nav, "left", LEFT);
    press(&mut nav, "up", UP);
    press(&mut nav, "down", DOWN);
    press(&mut nav, "keypad right", 102);
    press(&mut nav, "enter", ENTER);

    nav.focus(Some(&ExtSelector::Element(menu[2])));
    nav.disable("grid");
    press(&mut nav, "right", RIGHT);
    nav.enable("grid");
    press(&mut nav, "right", RIGHT);

    Ok(())
}
