//! Donor dashboard: post surplus, wait for an NGO to claim it, hand it to
//! the volunteer, then see the impact.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::SimulationConfig;
use crate::workflow::{ActionDef, Flow, Primary, Step, StepIcon, StepId};

pub static STEPS: &[Step] = &[
    Step::new(1, "Post Surplus", StepIcon::Gift),
    Step::new(2, "Wait for Claim", StepIcon::Eye),
    Step::new(3, "Handover", StepIcon::Package),
    Step::new(4, "Impact", StepIcon::Party),
];

/// Freshness the scanner reports once verification finishes
const VERIFIED_FRESHNESS: u8 = 98;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FoodCategory {
    #[default]
    CookedMeal,
    RawIngredients,
    PackagedFood,
    BakeryItems,
}

impl FoodCategory {
    const ALL: [FoodCategory; 4] = [
        FoodCategory::CookedMeal,
        FoodCategory::RawIngredients,
        FoodCategory::PackagedFood,
        FoodCategory::BakeryItems,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FoodCategory::CookedMeal => "Cooked Meal",
            FoodCategory::RawIngredients => "Raw Ingredients",
            FoodCategory::PackagedFood => "Packaged Food",
            FoodCategory::BakeryItems => "Bakery Items",
        }
    }

    pub fn cycle(self) -> Self {
        cycle(&Self::ALL, self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuantityUnit {
    #[default]
    Plates,
    Kg,
    Liters,
    Servings,
}

impl QuantityUnit {
    const ALL: [QuantityUnit; 4] = [
        QuantityUnit::Plates,
        QuantityUnit::Kg,
        QuantityUnit::Liters,
        QuantityUnit::Servings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            QuantityUnit::Plates => "Plates",
            QuantityUnit::Kg => "Kg",
            QuantityUnit::Liters => "Liters",
            QuantityUnit::Servings => "Servings",
        }
    }

    pub fn cycle(self) -> Self {
        cycle(&Self::ALL, self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    #[default]
    RoomTemperature,
    Refrigerated,
    Frozen,
    HotHold,
}

impl StorageKind {
    const ALL: [StorageKind; 4] = [
        StorageKind::RoomTemperature,
        StorageKind::Refrigerated,
        StorageKind::Frozen,
        StorageKind::HotHold,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StorageKind::RoomTemperature => "Room Temperature",
            StorageKind::Refrigerated => "Refrigerated",
            StorageKind::Frozen => "Frozen",
            StorageKind::HotHold => "Hot Hold",
        }
    }

    pub fn cycle(self) -> Self {
        cycle(&Self::ALL, self)
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T) -> T {
    let i = all.iter().position(|v| *v == current).unwrap_or(0);
    all[(i + 1) % all.len()]
}

/// The surplus listing being filled in on step 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationDraft {
    pub food_name: String,
    pub category: FoodCategory,
    pub quantity: u32,
    pub unit: QuantityUnit,
    pub is_veg: bool,
    pub pickup_window: String,
    pub storage: StorageKind,
}

impl Default for DonationDraft {
    fn default() -> Self {
        Self {
            food_name: "Veg Biryani".to_string(),
            category: FoodCategory::default(),
            quantity: 150,
            unit: QuantityUnit::default(),
            is_veg: true,
            pickup_window: "2:00 PM - 5:00 PM".to_string(),
            storage: StorageKind::default(),
        }
    }
}

impl DonationDraft {
    /// "150 Plates"
    pub fn quantity_label(&self) -> String {
        format!("{} {}", self.quantity, self.unit.label())
    }
}

/// AI freshness scan of the food photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanStatus {
    #[default]
    Idle,
    Scanning,
    Verified {
        freshness: u8,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DonorFlags {
    pub draft: DonationDraft,
    pub scan: ScanStatus,
    pub donation_submitted: bool,
    pub listing_id: Option<String>,
    pub claimed_by: Option<String>,
    pub claimed: bool,
    pub picked_up: bool,
}

impl DonorFlags {
    /// Meals the listing provides once delivered
    pub fn meals_impact(&self) -> u32 {
        self.draft.quantity
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DonorAction {
    ScanFood,
    PublishListing,
    AcceptClaim,
    ConfirmPickup,
    ToggleDiet,
    CycleCategory,
    CycleUnit,
    CycleStorage,
    AdjustQuantity(i32),
}

#[derive(Debug, Clone)]
pub struct DonorFlow {
    catalog: Arc<Catalog>,
}

impl DonorFlow {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// NGO that picks up the listing: the closest one with capacity
    fn claiming_ngo(&self) -> String {
        self.catalog
            .ngos
            .iter()
            .min_by(|a, b| a.distance_km.total_cmp(&b.distance_km))
            .map(|ngo| ngo.name.clone())
            .unwrap_or_else(|| "A nearby NGO".to_string())
    }
}

fn new_listing_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("LST-{}", id[..8].to_uppercase())
}

impl Flow for DonorFlow {
    type Flags = DonorFlags;
    type Action = DonorAction;

    fn name(&self) -> &'static str {
        "donor"
    }

    fn steps(&self) -> &'static [Step] {
        STEPS
    }

    fn gate(&self, step: StepId, flags: &DonorFlags) -> bool {
        match step.get() {
            1 => flags.donation_submitted,
            2 => flags.claimed,
            3 => flags.picked_up,
            _ => false,
        }
    }

    fn primary(&self, step: StepId, flags: &DonorFlags) -> Primary<DonorAction> {
        match step.get() {
            1 if !flags.donation_submitted => Primary::Run(DonorAction::PublishListing),
            2 if !flags.claimed => Primary::Run(DonorAction::AcceptClaim),
            3 if !flags.picked_up => Primary::Run(DonorAction::ConfirmPickup),
            1..=3 => Primary::Next,
            _ => Primary::Restart,
        }
    }

    fn action_def(&self, action: &DonorAction, timing: &SimulationConfig) -> ActionDef {
        match action {
            DonorAction::ScanFood => ActionDef::delayed(1, timing.scan_delay(), false),
            DonorAction::PublishListing => ActionDef::delayed(1, timing.publish_delay(), true),
            DonorAction::AcceptClaim => ActionDef::delayed(2, timing.claim_delay(), true),
            DonorAction::ConfirmPickup => ActionDef::delayed(3, timing.pickup_delay(), true),
            DonorAction::ToggleDiet
            | DonorAction::CycleCategory
            | DonorAction::CycleUnit
            | DonorAction::CycleStorage
            | DonorAction::AdjustQuantity(_) => ActionDef::immediate(1),
        }
    }

    fn action_ready(&self, action: &DonorAction, flags: &DonorFlags) -> bool {
        match action {
            DonorAction::ScanFood => !matches!(flags.scan, ScanStatus::Verified { .. }),
            DonorAction::PublishListing => !flags.donation_submitted,
            DonorAction::AcceptClaim => flags.donation_submitted && !flags.claimed,
            DonorAction::ConfirmPickup => flags.claimed && !flags.picked_up,
            // The listing is frozen once published
            _ => !flags.donation_submitted,
        }
    }

    fn begin(&self, action: &DonorAction, flags: &mut DonorFlags) {
        if *action == DonorAction::ScanFood {
            flags.scan = ScanStatus::Scanning;
        }
    }

    fn rollback(&self, action: &DonorAction, flags: &mut DonorFlags) {
        if *action == DonorAction::ScanFood {
            flags.scan = ScanStatus::Idle;
        }
    }

    fn complete(&self, action: &DonorAction, flags: &mut DonorFlags) {
        match action {
            DonorAction::ScanFood => {
                flags.scan = ScanStatus::Verified {
                    freshness: VERIFIED_FRESHNESS,
                };
            }
            DonorAction::PublishListing => {
                flags.donation_submitted = true;
                flags.listing_id = Some(new_listing_id());
            }
            DonorAction::AcceptClaim => {
                flags.claimed = true;
                flags.claimed_by = Some(self.claiming_ngo());
            }
            DonorAction::ConfirmPickup => flags.picked_up = true,
            DonorAction::ToggleDiet => flags.draft.is_veg = !flags.draft.is_veg,
            DonorAction::CycleCategory => flags.draft.category = flags.draft.category.cycle(),
            DonorAction::CycleUnit => flags.draft.unit = flags.draft.unit.cycle(),
            DonorAction::CycleStorage => flags.draft.storage = flags.draft.storage.cycle(),
            DonorAction::AdjustQuantity(delta) => {
                let next = i64::from(flags.draft.quantity) + i64::from(*delta);
                flags.draft.quantity = next.clamp(1, i64::from(u32::MAX)) as u32;
            }
        }
    }
}
