//! Render models painted by the host.
//!
//! Grid buttons are described by [`ButtonSpec`] records. A spec is built into
//! an [`Element`] and mounted into a stage [`Surface`]; on every re-render the
//! region is torn down completely before the new elements mount, so a stale
//! element can never receive a click.
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::grid::{GridDay, MonthCell, YearCell};

new_key_type! {
    /// Key of a mounted element. Keys of removed elements stay invalid.
    pub struct ElementKey;
}

/// Area of a stage surface that holds one kind of button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Day cells of the month grid.
    DayButtons,
    /// Month cells of the month picker.
    MonthButtons,
    /// Year cells of the year picker.
    YearButtons,
    /// Hour strip of the time stage.
    HourButtons,
    /// Minute strip of the time stage.
    MinuteButtons,
}

/// Tagged description of a single grid button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonSpec {
    /// A day of the month grid.
    Day(GridDay),
    /// A month of the month picker.
    Month(MonthCell),
    /// A year of the year picker.
    Year(YearCell),
    /// An hour of the hour strip, in 12-hour display form.
    Hour {
        /// Display hour (1-12).
        hour: u32,
        /// True for the working hour.
        is_selected: bool,
    },
    /// A minute of the minute strip.
    Minute {
        /// Minute (0-59).
        minute: u32,
        /// True for the working minute.
        is_selected: bool,
    },
}

impl ButtonSpec {
    /// Returns the text painted on the button.
    pub fn label(&self) -> String {
        match self {
            ButtonSpec::Day(cell) => cell.date.day().to_string(),
            ButtonSpec::Month(cell) => month_name(cell.month).to_owned(),
            ButtonSpec::Year(cell) => cell.year.to_string(),
            ButtonSpec::Hour { hour, .. } => hour.to_string(),
            ButtonSpec::Minute { minute, .. } => format!("{minute:02}"),
        }
    }

    /// Returns true when the button represents the working value.
    pub fn is_selected(&self) -> bool {
        match self {
            ButtonSpec::Day(cell) => cell.is_selected_day,
            ButtonSpec::Month(cell) => cell.is_selected,
            ButtonSpec::Year(cell) => cell.is_selected,
            ButtonSpec::Hour { is_selected, .. } | ButtonSpec::Minute { is_selected, .. } => {
                *is_selected
            }
        }
    }
}

/// A built button ready to be painted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    spec: ButtonSpec,
    label: String,
    classes: SmallVec<[&'static str; 2]>,
}

impl Element {
    /// Returns the record this element was built from.
    pub fn spec(&self) -> &ButtonSpec {
        &self.spec
    }

    /// Returns the painted text.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the style classes, such as `selected` or `outside-month`.
    pub fn classes(&self) -> &[&'static str] {
        &self.classes
    }

    /// Returns true when the element carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| *c == class)
    }
}

/// Turns a description into a paintable element.
pub trait Buildable {
    /// Builds a fresh element.
    fn build(&self) -> Element;
}

/// Mounts a buildable description into a surface region.
pub trait Mountable: Buildable {
    /// Builds the element and mounts it at the end of `region`.
    fn mount_into(&self, surface: &mut Surface, region: Region) -> ElementKey {
        surface.insert(region, self.build())
    }
}

impl Buildable for ButtonSpec {
    fn build(&self) -> Element {
        let mut classes = SmallVec::new();
        if self.is_selected() {
            classes.push("selected");
        }
        if let ButtonSpec::Day(cell) = self
            && cell.is_outside_current_month
        {
            classes.push("outside-month");
        }
        Element {
            spec: *self,
            label: self.label(),
            classes,
        }
    }
}

impl Mountable for ButtonSpec {}

struct Mounted {
    region: Region,
    element: Element,
}

/// Store of the elements currently mounted by one stage.
#[derive(Default)]
pub struct Surface {
    elements: SlotMap<ElementKey, Mounted>,
    order: FxHashMap<Region, Vec<ElementKey>>,
}

impl Surface {
    /// Creates an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, region: Region, element: Element) -> ElementKey {
        let key = self.elements.insert(Mounted { region, element });
        self.order.entry(region).or_default().push(key);
        key
    }

    /// Removes a single element. Returns `None` for a stale key.
    pub fn remove(&mut self, key: ElementKey) -> Option<Element> {
        let mounted = self.elements.remove(key)?;
        if let Some(keys) = self.order.get_mut(&mounted.region) {
            keys.retain(|k| *k != key);
        }
        Some(mounted.element)
    }

    /// Removes every element of `region` and returns how many were removed.
    pub fn clear_region(&mut self, region: Region) -> usize {
        let keys = self.order.remove(&region).unwrap_or_default();
        keys.into_iter()
            .filter(|key| self.elements.remove(*key).is_some())
            .count()
    }

    /// Tears `region` down and mounts `specs` in order.
    pub fn rebuild<'a, M>(&mut self, region: Region, specs: impl IntoIterator<Item = &'a M>)
    where
        M: Mountable + 'a,
    {
        let removed = self.clear_region(region);
        for spec in specs {
            spec.mount_into(self, region);
        }
        tracing::trace!(?region, removed, mounted = self.region_len(region), "rebuilt region");
    }

    /// Looks up a mounted element.
    pub fn get(&self, key: ElementKey) -> Option<&Element> {
        self.elements.get(key).map(|mounted| &mounted.element)
    }

    /// Returns the region a mounted element lives in.
    pub fn region_of(&self, key: ElementKey) -> Option<Region> {
        self.elements.get(key).map(|mounted| mounted.region)
    }

    /// Returns the keys of `region` in mount order.
    pub fn keys(&self, region: Region) -> &[ElementKey] {
        self.order.get(&region).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the elements of `region` in mount order.
    pub fn elements(&self, region: Region) -> impl Iterator<Item = &Element> + '_ {
        self.keys(region).iter().filter_map(|key| self.get(*key))
    }

    /// Returns the number of elements mounted in `region`.
    pub fn region_len(&self, region: Region) -> usize {
        self.keys(region).len()
    }

    /// Returns the total number of mounted elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true when nothing is mounted.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Visibility of a stage's footer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlButtons {
    /// Cancel closes the picker without committing.
    pub cancel: bool,
    /// Back returns from the time stage to the date stage.
    pub back: bool,
    /// Confirm commits the selection.
    pub confirm: bool,
    /// Next advances from the date stage to the time stage.
    pub next: bool,
}

pub(crate) fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour(hour: u32, is_selected: bool) -> ButtonSpec {
        ButtonSpec::Hour { hour, is_selected }
    }

    #[test]
    fn test_build_sets_classes() {
        let element = hour(3, true).build();
        assert_eq!(element.label(), "3");
        assert!(element.has_class("selected"));

        let minute = ButtonSpec::Minute {
            minute: 5,
            is_selected: false,
        }
        .build();
        assert_eq!(minute.label(), "05");
        assert!(minute.classes().is_empty());

        let month = ButtonSpec::Month(MonthCell {
            month: 9,
            is_selected: false,
        });
        assert_eq!(month.label(), "September");
    }

    #[test]
    fn test_rebuild_tears_down_previous_elements() {
        let mut surface = Surface::new();
        let first = [hour(1, false), hour(2, true), hour(3, false)];
        surface.rebuild(Region::HourButtons, &first);
        let stale = surface.keys(Region::HourButtons).to_vec();
        assert_eq!(stale.len(), 3);

        let second = [hour(4, false), hour(5, true)];
        surface.rebuild(Region::HourButtons, &second);
        assert_eq!(surface.len(), 2);
        assert!(stale.iter().all(|key| surface.get(*key).is_none()));
        let labels: Vec<&str> = surface
            .elements(Region::HourButtons)
            .map(Element::label)
            .collect();
        assert_eq!(labels, vec!["4", "5"]);
    }

    #[test]
    fn test_regions_are_independent() {
        let mut surface = Surface::new();
        surface.rebuild(Region::HourButtons, &[hour(1, true)]);
        surface.rebuild(
            Region::MinuteButtons,
            &[ButtonSpec::Minute {
                minute: 0,
                is_selected: true,
            }],
        );
        assert_eq!(surface.clear_region(Region::HourButtons), 1);
        assert_eq!(surface.region_len(Region::MinuteButtons), 1);
        assert_eq!(surface.clear_region(Region::HourButtons), 0);
    }

    #[test]
    fn test_remove_single_element() {
        let mut surface = Surface::new();
        surface.rebuild(Region::HourButtons, &[hour(1, false), hour(2, false)]);
        let key = surface.keys(Region::HourButtons)[0];
        assert_eq!(surface.region_of(key), Some(Region::HourButtons));
        assert!(surface.remove(key).is_some());
        assert!(surface.remove(key).is_none());
        assert_eq!(surface.region_len(Region::HourButtons), 1);
    }
}
