// SPDX-License-Identifier: MPL-2.0
//! "Available Examinations" screen: one card per assessment.

use super::record::ExamCard;
use super::resolver::{EligibilityResolver, Route};
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{palette, sizing, spacing, typography};
use crate::ui::styles;
use iced::widget::{button, column, container, row, scrollable, text, Column, Row, Space};
use iced::{Element, Length};

/// Cards per row.
const CARDS_PER_ROW: usize = 3;

#[derive(Debug, Clone)]
pub enum Message {
    GiveTest(Route),
}

pub fn view<'a>(resolver: &'a EligibilityResolver, i18n: &'a I18n) -> Element<'a, Message> {
    let title = text(i18n.tr("examination-title")).size(typography::TITLE_LG);

    let body: Element<'a, Message> = match resolver.resolution() {
        Some(resolution) => card_grid(resolution.cards(), i18n),
        None => text(i18n.tr("examination-loading")).into(),
    };

    container(scrollable(
        column![title, body]
            .spacing(spacing::LG)
            .padding(spacing::LG),
    ))
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

fn card_grid<'a>(cards: Vec<ExamCard>, i18n: &'a I18n) -> Element<'a, Message> {
    let mut grid = Column::new().spacing(spacing::MD);
    let mut cards = cards.into_iter().peekable();

    while cards.peek().is_some() {
        let mut line = Row::new().spacing(spacing::MD);
        let mut filled = 0;
        for card in cards.by_ref().take(CARDS_PER_ROW) {
            line = line.push(card_view(card, i18n));
            filled += 1;
        }
        for _ in filled..CARDS_PER_ROW {
            line = line.push(Space::new().width(Length::FillPortion(1)));
        }
        grid = grid.push(line);
    }

    grid.into()
}

fn card_view<'a>(card: ExamCard, i18n: &'a I18n) -> Element<'a, Message> {
    let mut details = Column::new()
        .spacing(spacing::XS)
        .push(text(card.title.clone()).size(typography::TITLE_MD));

    if let Some(location) = &card.location {
        details = details.push(
            text(location.clone())
                .size(typography::BODY)
                .color(palette::ERROR_500),
        );
    }

    if let Some(work_type) = &card.work_type {
        details = details.push(tag(work_type.clone(), palette::SUCCESS_500));
    }

    details = details.push(text(card.description.clone()).size(typography::BODY));

    if !card.skills.is_empty() {
        let skills = card
            .skills
            .iter()
            .fold(Row::new().spacing(spacing::XS), |skills, skill| {
                skills.push(tag(skill.clone(), palette::PRIMARY_600))
            })
            .wrap();
        details = details.push(skills);
    }

    if let Some(score) = &card.ai_score {
        details = details.push(
            text(i18n.tr_with_args("examination-ai-score", &[("score", score)]))
                .size(typography::BODY_SM),
        );
    }
    if let Some(explanation) = &card.ai_explanation {
        details = details.push(text(explanation.clone()).size(typography::CAPTION));
    }

    details = details
        .push(window_line(i18n.tr("examination-from"), card.starts()))
        .push(window_line(i18n.tr("examination-to"), card.ends()));

    let give_test = button(text(i18n.tr("examination-give-test")))
        .width(Length::Fixed(sizing::GIVE_TEST_WIDTH))
        .on_press_maybe(card.action().map(Message::GiveTest))
        .style(styles::button::primary);

    container(
        column![
            details,
            container(Space::new().height(1.0))
                .width(Length::Fill)
                .style(styles::container::divider),
            row![Space::new().width(Length::Fill), give_test],
        ]
        .spacing(spacing::SM),
    )
    .padding(spacing::MD)
    .width(Length::FillPortion(1))
    .style(styles::container::card)
    .into()
}

fn window_line<'a>(label: String, value: String) -> Element<'a, Message> {
    row![
        text(label)
            .size(typography::BODY)
            .width(Length::Fixed(sizing::LABEL_WIDTH)),
        text(value).size(typography::BODY),
    ]
    .spacing(spacing::XS)
    .into()
}

fn tag<'a>(label: String, accent: iced::Color) -> Element<'a, Message> {
    container(text(label).size(typography::CAPTION))
        .padding([spacing::XXS, spacing::SM])
        .style(styles::container::tag(accent))
        .into()
}
