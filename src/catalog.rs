//! Read-only data behind the dashboards: donations, NGOs, volunteer tasks,
//! history and headline stats, plus the impact arithmetic.
//!
//! `Catalog::demo()` is the built-in data set. A TOML or JSON file with the
//! same shape can replace it via `paths.catalog`.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Items on the volunteer drop-off checklist
pub const CHECKLIST_ITEMS: usize = 4;

/// Pounds of food per rescued meal
pub const POUNDS_PER_MEAL: f64 = 1.2;

/// Pounds of CO2 prevented per pound of food rescued
const CO2_PER_POUND: f64 = 3.66;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Urgent,
    Expiring,
    Fresh,
}

impl Urgency {
    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Urgent => "Urgent",
            Urgency::Expiring => "Expiring Soon",
            Urgency::Fresh => "Fresh",
        }
    }

    /// Weight in the priority score
    fn weight(self) -> f64 {
        match self {
            Urgency::Urgent => 100.0,
            Urgency::Expiring => 60.0,
            Urgency::Fresh => 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    Available,
    Claimed,
    PickedUp,
    Delivered,
}

/// NGO intake capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capacity {
    High,
    Medium,
    Low,
}

impl Capacity {
    pub fn label(&self) -> &'static str {
        match self {
            Capacity::High => "High",
            Capacity::Medium => "Medium",
            Capacity::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Accepted,
    PickedUp,
    Delivered,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Accepted => "Accepted",
            TaskStatus::PickedUp => "Picked Up",
            TaskStatus::Delivered => "Delivered",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryStatus {
    Delivered,
    Claimed,
    Pending,
    Expired,
}

impl HistoryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HistoryStatus::Delivered => "Delivered",
            HistoryStatus::Claimed => "Claimed",
            HistoryStatus::Pending => "Pending",
            HistoryStatus::Expired => "Expired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupStatus {
    PickedUp,
    Accepted,
    EnRoute,
}

impl PickupStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PickupStatus::PickedUp => "Picked Up",
            PickupStatus::Accepted => "Accepted",
            PickupStatus::EnRoute => "En Route",
        }
    }
}

/// A surplus listing visible to NGOs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: String,
    pub food_type: String,
    pub quantity: String,
    pub source: String,
    pub distance_km: f64,
    pub time_ago: String,
    pub is_veg: bool,
    /// 0-100
    pub freshness: u8,
    pub status: DonationStatus,
    pub urgency: Urgency,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ngo {
    pub name: String,
    pub distance_km: f64,
    pub capacity: Capacity,
    pub needs: String,
}

/// Volunteer an NGO can assign to a pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolunteerProfile {
    pub name: String,
    pub vehicle: String,
    pub distance_km: f64,
    pub rating: f32,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolunteerTask {
    pub id: String,
    pub food_item: String,
    pub quantity: String,
    pub from: String,
    pub to: String,
    pub distance_km: f64,
    pub eta: String,
    pub priority: Priority,
    pub status: TaskStatus,
}

/// One past donation in the donor's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationRecord {
    pub id: String,
    pub food_item: String,
    pub ngo: String,
    pub date: NaiveDate,
    pub freshness: u8,
    pub status: HistoryStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingPickup {
    pub id: String,
    pub food_item: String,
    pub volunteer: String,
    pub eta: String,
    pub status: PickupStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorStats {
    pub total_donations: u64,
    pub total_donations_change: String,
    pub meals_rescued: u64,
    pub meals_rescued_change: String,
    pub avg_freshness: u8,
    pub ngos_served: u64,
    pub ngos_served_change: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NgoStats {
    pub meals_received: u64,
    pub meals_received_change: String,
    pub people_served: u64,
    pub people_served_change: String,
    pub active_donations: u64,
    pub waste_reduced: String,
    pub waste_reduced_change: String,
    pub capacity_used: u32,
    pub capacity_total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolunteerStats {
    pub completed_deliveries: u64,
    pub completed_deliveries_change: String,
    pub active_pickups: u64,
    pub volunteer_score: f32,
    pub total_distance: String,
    pub total_distance_change: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactStats {
    pub total_meals_rescued: u64,
    pub total_co2_saved: f64,
    pub total_donors: u64,
    pub total_ngos: u64,
    pub total_volunteers: u64,
    pub cities_covered: u64,
}

/// Everything the dashboards read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub donor_stats: DonorStats,
    pub ngo_stats: NgoStats,
    pub volunteer_stats: VolunteerStats,
    pub impact: ImpactStats,
    pub donations: Vec<Donation>,
    pub ngos: Vec<Ngo>,
    pub volunteers: Vec<VolunteerProfile>,
    pub tasks: Vec<VolunteerTask>,
    pub history: Vec<DonationRecord>,
    pub incoming_pickups: Vec<IncomingPickup>,
    /// Drop-off protocol checklist, in display order
    pub checklist: Vec<String>,
    /// Notes shown to the volunteer on the way to a pickup
    pub pickup_notes: Vec<String>,
}

impl Catalog {
    /// Load a catalog file, or the built-in data when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::demo());
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;

        let catalog: Catalog = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&raw)
                .with_context(|| format!("Failed to parse TOML catalog {}", path.display()))?,
            Some("json") => serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse JSON catalog {}", path.display()))?,
            other => bail!(
                "Unsupported catalog format {:?} (expected .toml or .json)",
                other.unwrap_or("")
            ),
        };

        if catalog.checklist.len() != CHECKLIST_ITEMS {
            bail!(
                "Catalog {} must list exactly {} drop-off checklist items, found {}",
                path.display(),
                CHECKLIST_ITEMS,
                catalog.checklist.len()
            );
        }

        Ok(catalog)
    }

    pub fn donation(&self, id: &str) -> Option<&Donation> {
        self.donations.iter().find(|d| d.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&VolunteerTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn volunteer(&self, name: &str) -> Option<&VolunteerProfile> {
        self.volunteers.iter().find(|v| v.name == name)
    }

    /// Donations still open for claiming
    pub fn available_donations(&self) -> impl Iterator<Item = &Donation> {
        self.donations
            .iter()
            .filter(|d| d.status == DonationStatus::Available)
    }

    /// Open donations matching `filter`, most urgent first
    pub fn ranked_donations(&self, filter: DonationFilter) -> Vec<&Donation> {
        let mut ranked: Vec<&Donation> = self
            .available_donations()
            .filter(|d| filter.matches(d))
            .collect();
        ranked.sort_by_key(|d| std::cmp::Reverse(priority_score(d)));
        ranked
    }

    /// The data set the dashboards ship with
    pub fn demo() -> Self {
        Self {
            donor_stats: DonorStats {
                total_donations: 42,
                total_donations_change: "+8 this week".to_string(),
                meals_rescued: 1260,
                meals_rescued_change: "+180 this week".to_string(),
                avg_freshness: 89,
                ngos_served: 12,
                ngos_served_change: "+2 new".to_string(),
            },
            ngo_stats: NgoStats {
                meals_received: 3240,
                meals_received_change: "+420 this week".to_string(),
                people_served: 8560,
                people_served_change: "+1,200 this week".to_string(),
                active_donations: 7,
                waste_reduced: "2.1 tons".to_string(),
                waste_reduced_change: "↓ 15% spoilage".to_string(),
                capacity_used: 320,
                capacity_total: 500,
            },
            volunteer_stats: VolunteerStats {
                completed_deliveries: 87,
                completed_deliveries_change: "+12 this week".to_string(),
                active_pickups: 2,
                volunteer_score: 4.8,
                total_distance: "342 km".to_string(),
                total_distance_change: "This month".to_string(),
            },
            impact: ImpactStats {
                total_meals_rescued: 128_450,
                total_co2_saved: 192.7,
                total_donors: 1240,
                total_ngos: 85,
                total_volunteers: 3200,
                cities_covered: 12,
            },
            donations: vec![
                donation(
                    "DON-001",
                    "Biryani (120 plates)",
                    "120 plates",
                    "Grand Hyatt Catering",
                    1.8,
                    "30 min ago",
                    false,
                    94,
                    Urgency::Urgent,
                    Priority::High,
                ),
                donation(
                    "DON-002",
                    "Veg Pulao (80 plates)",
                    "80 plates",
                    "Taj Events",
                    2.5,
                    "1 hr ago",
                    true,
                    88,
                    Urgency::Fresh,
                    Priority::Medium,
                ),
                donation(
                    "DON-003",
                    "Bread & Butter (200 pcs)",
                    "200 pcs",
                    "Monginis Bakery",
                    3.2,
                    "2 hr ago",
                    true,
                    75,
                    Urgency::Expiring,
                    Priority::Medium,
                ),
                donation(
                    "DON-004",
                    "Mixed Fruits (50 kg)",
                    "50 kg",
                    "FreshMart Stores",
                    4.0,
                    "1.5 hr ago",
                    true,
                    92,
                    Urgency::Fresh,
                    Priority::Low,
                ),
            ],
            ngos: vec![
                Ngo {
                    name: "Akshaya Patra Foundation".to_string(),
                    distance_km: 2.3,
                    capacity: Capacity::High,
                    needs: "Cooked meals".to_string(),
                },
                Ngo {
                    name: "Feeding India - Zomato".to_string(),
                    distance_km: 3.1,
                    capacity: Capacity::Medium,
                    needs: "Any food".to_string(),
                },
                Ngo {
                    name: "Robin Hood Army".to_string(),
                    distance_km: 4.7,
                    capacity: Capacity::High,
                    needs: "Packaged food".to_string(),
                },
            ],
            volunteers: vec![
                VolunteerProfile {
                    name: "Rahul Sharma".to_string(),
                    vehicle: "Bike".to_string(),
                    distance_km: 1.2,
                    rating: 4.9,
                    available: true,
                },
                VolunteerProfile {
                    name: "Amit Kumar".to_string(),
                    vehicle: "Car".to_string(),
                    distance_km: 2.5,
                    rating: 4.7,
                    available: true,
                },
            ],
            tasks: vec![
                task(
                    "VT-001",
                    "Biryani (120 plates)",
                    "120 plates",
                    "Grand Hyatt",
                    "Akshaya Patra",
                    5.2,
                    "20 min",
                    Priority::High,
                    TaskStatus::Pending,
                ),
                task(
                    "VT-002",
                    "Veg Pulao (80 plates)",
                    "80 plates",
                    "Taj Events",
                    "Feeding India",
                    3.8,
                    "15 min",
                    Priority::Medium,
                    TaskStatus::Accepted,
                ),
                task(
                    "VT-003",
                    "Bread (200 pcs)",
                    "200 pcs",
                    "Monginis",
                    "Robin Hood Army",
                    6.1,
                    "25 min",
                    Priority::Low,
                    TaskStatus::Pending,
                ),
            ],
            history: vec![
                record("D-1042", "Paneer Curry (50 plates)", "Akshaya Patra", (2026, 2, 13), 92, HistoryStatus::Delivered),
                record("D-1041", "Rice & Dal (100 plates)", "Feeding India", (2026, 2, 12), 88, HistoryStatus::Delivered),
                record("D-1040", "Sandwiches (80 pcs)", "Robin Hood Army", (2026, 2, 11), 78, HistoryStatus::Delivered),
                record("D-1039", "Fruit Salad (30 kg)", "Akshaya Patra", (2026, 2, 10), 95, HistoryStatus::Delivered),
                record("D-1038", "Pasta (60 plates)", "Feeding India", (2026, 2, 9), 85, HistoryStatus::Expired),
            ],
            incoming_pickups: vec![
                IncomingPickup {
                    id: "IP-001".to_string(),
                    food_item: "Biryani (120 plates)".to_string(),
                    volunteer: "Rahul Sharma".to_string(),
                    eta: "15 min".to_string(),
                    status: PickupStatus::PickedUp,
                },
                IncomingPickup {
                    id: "IP-002".to_string(),
                    food_item: "Veg Pulao (80 plates)".to_string(),
                    volunteer: "Priya Patel".to_string(),
                    eta: "25 min".to_string(),
                    status: PickupStatus::Accepted,
                },
            ],
            checklist: vec![
                "Containers Sealed & Intact".to_string(),
                "Temperature Range Verified".to_string(),
                "Handover Signed by NGO".to_string(),
                "Vehicle Cleaned Post-trip".to_string(),
            ],
            pickup_notes: vec![
                "Main Entrance, ask for Manager".to_string(),
                "6 Large Containers (Fragile)".to_string(),
                "Take photo of seal".to_string(),
            ],
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn donation(
    id: &str,
    food_type: &str,
    quantity: &str,
    source: &str,
    distance_km: f64,
    time_ago: &str,
    is_veg: bool,
    freshness: u8,
    urgency: Urgency,
    priority: Priority,
) -> Donation {
    Donation {
        id: id.to_string(),
        food_type: food_type.to_string(),
        quantity: quantity.to_string(),
        source: source.to_string(),
        distance_km,
        time_ago: time_ago.to_string(),
        is_veg,
        freshness,
        status: DonationStatus::Available,
        urgency,
        priority,
    }
}

#[allow(clippy::too_many_arguments)]
fn task(
    id: &str,
    food_item: &str,
    quantity: &str,
    from: &str,
    to: &str,
    distance_km: f64,
    eta: &str,
    priority: Priority,
    status: TaskStatus,
) -> VolunteerTask {
    VolunteerTask {
        id: id.to_string(),
        food_item: food_item.to_string(),
        quantity: quantity.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        distance_km,
        eta: eta.to_string(),
        priority,
        status,
    }
}

fn record(
    id: &str,
    food_item: &str,
    ngo: &str,
    (year, month, day): (i32, u32, u32),
    freshness: u8,
    status: HistoryStatus,
) -> DonationRecord {
    DonationRecord {
        id: id.to_string(),
        food_item: food_item.to_string(),
        ngo: ngo.to_string(),
        date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        freshness,
        status,
    }
}

/// Surplus list filter on the NGO dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DonationFilter {
    #[default]
    All,
    Veg,
    NonVeg,
    Urgent,
}

impl DonationFilter {
    pub fn all() -> &'static [DonationFilter] {
        &[
            DonationFilter::All,
            DonationFilter::Veg,
            DonationFilter::NonVeg,
            DonationFilter::Urgent,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            DonationFilter::All => "All",
            DonationFilter::Veg => "Veg Only",
            DonationFilter::NonVeg => "Non-Veg",
            DonationFilter::Urgent => "Urgent Only",
        }
    }

    pub fn matches(&self, donation: &Donation) -> bool {
        match self {
            DonationFilter::All => true,
            DonationFilter::Veg => donation.is_veg,
            DonationFilter::NonVeg => !donation.is_veg,
            DonationFilter::Urgent => donation.urgency == Urgency::Urgent,
        }
    }

    /// Next filter in display order, wrapping around
    pub fn cycle(self) -> Self {
        let all = Self::all();
        let i = all.iter().position(|f| *f == self).unwrap_or(0);
        all[(i + 1) % all.len()]
    }
}

/// Freshness colour band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessBand {
    Good,
    Fair,
    Poor,
}

pub fn freshness_band(value: u8) -> FreshnessBand {
    if value >= 80 {
        FreshnessBand::Good
    } else if value >= 50 {
        FreshnessBand::Fair
    } else {
        FreshnessBand::Poor
    }
}

/// Meals served by `pounds` of rescued food
pub fn calculate_meals(pounds: f64) -> u64 {
    (pounds / POUNDS_PER_MEAL).round().max(0.0) as u64
}

/// Pounds of CO2 prevented, to one decimal place
pub fn calculate_co2_prevented(pounds: f64) -> f64 {
    (pounds * CO2_PER_POUND * 10.0).round() / 10.0
}

/// Urgency ranking for a donation; higher is more urgent.
///
/// Expiry dominates, closer pickups gain up to 50 points, and freshness adds
/// a small bonus.
pub fn priority_score(donation: &Donation) -> u32 {
    let distance_bonus = (50.0 - donation.distance_km * 10.0).max(0.0);
    let freshness_bonus = f64::from(donation.freshness) * 0.3;
    (donation.urgency.weight() + distance_bonus + freshness_bonus).round() as u32
}

/// Compact display for large counts: 3240 -> "3.2K", 128450 -> "128K".
/// Halves round up, so 1250 -> "1.3K" and 12500 -> "13K".
pub fn format_number(n: u64) -> String {
    let value = n as f64;
    if n >= 1_000_000 {
        format!("{:.1}M", (value / 100_000.0).round() / 10.0)
    } else if n >= 10_000 {
        format!("{:.0}K", (value / 1000.0).round())
    } else if n >= 1000 {
        format!("{:.1}K", (value / 100.0).round() / 10.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_demo_catalog_shape() {
        let catalog = Catalog::demo();
        assert_eq!(catalog.donations.len(), 4);
        assert_eq!(catalog.ngos.len(), 3);
        assert_eq!(catalog.tasks.len(), 3);
        assert_eq!(catalog.history.len(), 5);
        assert_eq!(catalog.checklist.len(), CHECKLIST_ITEMS);
        assert_eq!(catalog.available_donations().count(), 4);
    }

    #[test]
    fn test_priority_score_weights() {
        let catalog = Catalog::demo();
        assert_eq!(priority_score(catalog.donation("DON-001").unwrap()), 160);
        assert_eq!(priority_score(catalog.donation("DON-004").unwrap()), 58);
    }

    #[test]
    fn test_far_donations_get_no_distance_bonus() {
        let mut d = Catalog::demo().donations[0].clone();
        d.distance_km = 12.0;
        d.freshness = 0;
        assert_eq!(priority_score(&d), 100);
    }

    #[test]
    fn test_ranked_donations_puts_urgent_first() {
        let catalog = Catalog::demo();
        let ranked = catalog.ranked_donations(DonationFilter::All);
        assert_eq!(ranked[0].id, "DON-001");
        let veg = catalog.ranked_donations(DonationFilter::Veg);
        assert!(veg.iter().all(|d| d.is_veg));
        assert_eq!(veg.len(), 3);
    }

    #[test]
    fn test_ranked_donations_skip_taken_ones() {
        let mut catalog = Catalog::demo();
        catalog.donations[0].status = DonationStatus::Claimed;
        catalog.donations[2].status = DonationStatus::Delivered;

        let ranked = catalog.ranked_donations(DonationFilter::All);
        assert_eq!(ranked.len(), 2);
        assert!(ranked
            .iter()
            .all(|d| d.status == DonationStatus::Available));
        assert!(ranked.iter().all(|d| d.id != "DON-001"));
    }

    #[test]
    fn test_filter_cycle_wraps() {
        assert_eq!(DonationFilter::All.cycle(), DonationFilter::Veg);
        assert_eq!(DonationFilter::Urgent.cycle(), DonationFilter::All);
    }

    #[test]
    fn test_impact_math() {
        assert_eq!(calculate_meals(120.0), 100);
        assert_eq!(calculate_meals(0.0), 0);
        assert!((calculate_co2_prevented(10.0) - 36.6).abs() < f64::EPSILON);
        assert!((calculate_co2_prevented(1.0) - 3.7).abs() < 1e-9);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(3240), "3.2K");
        assert_eq!(format_number(128_450), "128K");
        assert_eq!(format_number(2_500_000), "2.5M");
    }

    #[test]
    fn test_format_number_rounds_halves_up() {
        assert_eq!(format_number(1250), "1.3K");
        assert_eq!(format_number(12_500), "13K");
        assert_eq!(format_number(1_250_000), "1.3M");
        assert_eq!(format_number(1_249_999), "1.2M");
    }

    #[test]
    fn test_freshness_bands() {
        assert_eq!(freshness_band(94), FreshnessBand::Good);
        assert_eq!(freshness_band(75), FreshnessBand::Fair);
        assert_eq!(freshness_band(20), FreshnessBand::Poor);
    }

    #[test]
    fn test_load_json_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.json");
        let mut catalog = Catalog::demo();
        catalog.donations.truncate(1);
        std::fs::write(&path, serde_json::to_string(&catalog).unwrap()).unwrap();

        let loaded = Catalog::load(Some(&path)).unwrap();
        assert_eq!(loaded.donations.len(), 1);
        assert_eq!(loaded.history[0].date, NaiveDate::from_ymd_opt(2026, 2, 13).unwrap());
    }

    #[test]
    fn test_load_toml_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.toml");
        std::fs::write(&path, toml::to_string(&Catalog::demo()).unwrap()).unwrap();

        let loaded = Catalog::load(Some(&path)).unwrap();
        assert_eq!(loaded, Catalog::demo());
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.yaml");
        std::fs::write(&path, "donations: []").unwrap();
        assert!(Catalog::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_without_path_uses_demo() {
        assert_eq!(Catalog::load(None).unwrap(), Catalog::demo());
    }
}
