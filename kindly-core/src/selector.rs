//! Category picker offering one affordance per care category.

use crate::model::CategoryId;

/// A single selectable affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryOption {
    /// Category reported when activated.
    pub category: CategoryId,
    /// Button label.
    pub label: &'static str,
}

/// The three affordances, in display order. "All" is not one of them.
pub const CATEGORY_OPTIONS: [CategoryOption; 3] = [
    CategoryOption {
        category: CategoryId::ChildCare,
        label: CategoryId::ChildCare.label(),
    },
    CategoryOption {
        category: CategoryId::ElderCare,
        label: CategoryId::ElderCare.label(),
    },
    CategoryOption {
        category: CategoryId::PetCare,
        label: CategoryId::PetCare.label(),
    },
];

/// Stateless event source that reports the chosen category to its owner.
pub struct CategorySelector<F>
where
    F: FnMut(CategoryId),
{
    on_select: F,
}

impl<F> CategorySelector<F>
where
    F: FnMut(CategoryId),
{
    /// Bind the selector to the owner's callback.
    pub const fn new(on_select: F) -> Self {
        Self { on_select }
    }

    /// Affordances offered by the selector.
    #[must_use]
    pub const fn options(&self) -> &'static [CategoryOption] {
        &CATEGORY_OPTIONS
    }

    /// Activate the affordance at `index`. Out-of-range indices are ignored.
    pub fn activate(&mut self, index: usize) {
        if let Some(option) = CATEGORY_OPTIONS.get(index) {
            (self.on_select)(option.category);
        }
    }
}
