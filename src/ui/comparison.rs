use iced::widget::{button, column, container, horizontal_space, image, row, text};
use iced::{Alignment, ContentFit, Element, Length, Theme};
use std::path::Path;

use crate::state::data::{Sample, Slot};
use crate::Message;

/// Style of a clickable image: highlighted when it is the pending pick
fn tile_style(selected: bool) -> fn(&Theme, button::Status) -> button::Style {
    if selected {
        button::primary
    } else {
        button::secondary
    }
}

/// One clickable image
fn tile<'a>(sample: &Sample, root: &Path, slot: Slot, pending: Option<Slot>) -> Element<'a, Message> {
    let picture = image(image::Handle::from_path(sample.image_path(root, slot)))
        .width(Length::Fill)
        .height(Length::Fill)
        .content_fit(ContentFit::Contain);

    button(picture)
        .on_press(Message::Pick(slot))
        .style(tile_style(pending == Some(slot)))
        .padding(6)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// The comparison grid: candidates side by side on top, reference below
///
/// Which candidate lands left or right is decided by the sample's order
/// flag; the reference always takes the bottom row.
pub fn view<'a>(sample: &Sample, root: &Path, pending: Option<Slot>) -> Element<'a, Message> {
    let candidates = row![
        tile(sample, root, Slot::TopLeft, pending),
        tile(sample, root, Slot::TopRight, pending),
    ]
    .spacing(12)
    .height(Length::FillPortion(1));

    let reference = row![
        horizontal_space().width(Length::FillPortion(1)),
        container(tile(sample, root, Slot::Reference, pending)).width(Length::FillPortion(2)),
        horizontal_space().width(Length::FillPortion(1)),
    ]
    .height(Length::FillPortion(1));

    column![
        text(sample.label()).size(28),
        candidates,
        reference,
    ]
    .spacing(12)
    .align_x(Alignment::Center)
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

/// Shown once the service reports every sample rated
pub fn completion_banner<'a>() -> Element<'a, Message> {
    container(text("🎉 All samples are done. Thank you!").size(32))
        .width(Length::Fill)
        .center_x(Length::Fill)
        .padding(20)
        .into()
}
