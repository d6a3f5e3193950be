//! Counter Example - the full hook set driven interactively.
//!
//! This example demonstrates everything working together:
//! - use_state with an updater-function increment
//! - use_ref keeping a render counter alive across rebuilds
//! - use_memo caching the squared count
//! - use_effect logging when the count changes (set RUST_LOG=debug)
//!
//! Space or Enter clicks the button, q or Esc quits.
//!
//! Run with: cargo run --example counter

use std::io::{stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEventKind};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;

use wisp_ui::{el, mount, Event, HostNode, HostTag, Props, Scope, VNode};

fn hello(cx: &mut Scope, _props: &Props) -> VNode {
    let (count, set_count) = cx.use_state(0i64);

    // Stable across rebuilds: counts how often this instance rendered.
    let renders = cx.use_ref(0u32);
    renders.with_mut(|n| *n += 1);

    let squared = cx.use_memo((count,), move || count * count);
    let squared = *squared;

    cx.use_effect_with((count, squared), move || {
        tracing::debug!(count, squared, "count changed");
    });

    let on_click = {
        let set_count = set_count.clone();
        move |_: &Event| set_count.update(|n| n + 1)
    };

    el(
        HostTag::Div,
        Props::new().attr("style", "padding: 20px;"),
        vec![
            el(HostTag::H1, Props::new(), vec!["Counter demo".into()]).into(),
            el(
                HostTag::Button,
                Props::new()
                    .attr("style", "padding: 10px; margin: 10px 0;")
                    .on("click", on_click),
                vec![format!("Clicks: {count}").into()],
            )
            .into(),
            el(
                HostTag::P,
                Props::new().attr("style", "margin-top: 10px;"),
                vec![format!("Count squared: {squared}").into()],
            )
            .into(),
            el(
                HostTag::P,
                Props::new(),
                vec![format!("Renders of this instance: {}", renders.current()).into()],
            )
            .into(),
        ],
    )
}

fn redraw(container: &HostNode) -> std::io::Result<()> {
    let mut out = stdout();
    out.queue(Clear(ClearType::All))?.queue(MoveTo(0, 0))?;
    for line in container.to_pretty().lines() {
        write!(out, "{line}\r\n")?;
    }
    write!(out, "\r\n[space/enter] click the button   [q] quit\r\n")?;
    out.flush()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let container = HostNode::create(HostTag::Div);
    let handle = mount(VNode::component(hello, Props::new()), container.clone())?;

    terminal::enable_raw_mode()?;
    redraw(&container)?;

    loop {
        match event::read()? {
            TermEvent::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter => {
                    // The rebuild replaces every node, so look the button
                    // up again each time.
                    if let Some(button) = container.find_by_tag(HostTag::Button) {
                        button.emit("click");
                    }
                    redraw(&container)?;
                }
                KeyCode::Char('q') | KeyCode::Esc => break,
                _ => {}
            },
            _ => {}
        }
    }

    terminal::disable_raw_mode()?;
    handle.unmount();
    Ok(())
}
