use farm_core::*;
use farm_econ::{QualityTier, SaleChannel};
use farm_runtime::{ActionError, FarmSession};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn parcel(id: &str, province: Province) -> Parcel {
    Parcel {
        id: ParcelId::new(id),
        region: Region {
            province,
            county: "powiat".to_string(),
            commune: "gmina".to_string(),
            commune_type: CommuneType::Mixed,
            population: 40_000,
            market_size: 1.0,
            labor_cost_multiplier: Decimal::ONE,
        },
        soil_type: SoilType::SandyClay,
        ph: 6.5,
        fertility: Fraction::ONE,
        water_level: Fraction::saturating(0.6),
        humidity: Fraction::saturating(0.5),
        permeability: Fraction::saturating(0.5),
        area_ha: Decimal::new(20, 1),
        planted_trees: 800,
        tree_age: 8,
        is_organic: false,
        organic_certified: false,
        organic_conversion_season: None,
        quality: 80,
        last_harvest: None,
        last_fertilized: None,
    }
}

fn farm(cash: i64) -> Farm {
    Farm {
        name: "Sad Testowy".to_string(),
        cash: Decimal::from(cash),
        season: Season::Spring,
        season_number: 0,
        parcels: vec![
            parcel("north", Province::Lubelskie),
            parcel("south", Province::Malopolskie),
        ],
        infrastructure: vec![],
        inventory: Inventory::default(),
    }
}

fn session(cash: i64) -> FarmSession {
    FarmSession::new(farm(cash), GameRules::default()).unwrap()
}

#[test]
fn watering_adds_exactly_its_cost_to_operations() {
    let mut control = session(500_000);
    let mut watered = session(500_000);
    watered.water_parcel(&ParcelId::new("north")).unwrap();

    let a = control.advance_season().unwrap();
    let b = watered.advance_season().unwrap();
    assert_eq!(
        b.report.operational_costs - a.report.operational_costs,
        Decimal::from(200)
    );
    assert_eq!(b.report.labor_costs, a.report.labor_costs);
    assert_eq!(
        b.report.parcel(&ParcelId::new("north")).unwrap().costs
            - a.report.parcel(&ParcelId::new("north")).unwrap().costs,
        Decimal::from(200)
    );
}

#[test]
fn harvest_then_sell_books_revenue_by_channel() {
    let mut s = session(500_000);
    s.advance_season().unwrap();
    let north = s.harvest(&ParcelId::new("north")).unwrap();
    let south = s.harvest(&ParcelId::new("south")).unwrap();
    assert_eq!(north + south, 100_000);

    let retail = s.sell(SaleChannel::Retail, 300).unwrap();
    let wholesale = s.sell(SaleChannel::Wholesale, 99_700).unwrap();
    assert!(retail.quote.unit_price > wholesale.quote.unit_price);
    assert!(retail.sales.iter().all(|r| r.tier == QualityTier::Good));
    assert_eq!(s.farm().inventory.total_kg(), 0);

    let summer = s.advance_season().unwrap().report;
    assert_eq!(summer.season, Season::Summer);
    assert_eq!(summer.harvested_kg, 100_000);
    assert_eq!(summer.sold_kg, 100_000);
    assert_eq!(summer.retail_revenue, retail.revenue);
    assert_eq!(summer.wholesale_revenue, wholesale.revenue);
    let by_parcel: Decimal = summer.parcels.iter().map(|p| p.revenue).sum();
    assert_eq!(by_parcel, summer.total_revenue);
    assert_eq!(summer.volume_by_tier().get(&QualityTier::Good), Some(&100_000));
}

#[test]
fn four_seasons_roll_up_into_a_year() {
    let mut s = session(500_000);
    s.purchase_infrastructure(InfrastructureKind::Tractor).unwrap();
    s.fertilize_parcel(&ParcelId::new("south")).unwrap();
    let mut outcomes = vec![s.advance_season().unwrap()];
    s.harvest(&ParcelId::new("north")).unwrap();
    s.harvest(&ParcelId::new("south")).unwrap();
    s.sell(SaleChannel::Wholesale, 60_000).unwrap();
    outcomes.push(s.advance_season().unwrap());
    s.sell(SaleChannel::Retail, 40_000).unwrap();
    outcomes.push(s.advance_season().unwrap());
    assert!(outcomes.iter().all(|o| o.yearly.is_none()));
    outcomes.push(s.advance_season().unwrap());

    let year = outcomes[3].yearly.clone().unwrap();
    assert_eq!(year.year, 1);
    let sum = |f: fn(&farm_stats::SeasonReport) -> Decimal| {
        outcomes.iter().map(|o| f(&o.report)).sum::<Decimal>()
    };
    assert_eq!(year.total_costs, sum(|r| r.total_costs));
    assert_eq!(year.total_revenue, sum(|r| r.total_revenue));
    assert_eq!(year.net_profit, sum(|r| r.net_profit));
    assert_eq!(year.investment_costs, Decimal::from(30_000));
    assert!(year.best_parcel.is_some());
    assert!(year.best_province.is_some());
    assert_eq!(s.stats().yearly_reports().len(), 1);
    assert_eq!(s.farm().season, Season::Spring);
    assert_eq!(s.farm().season_number, 4);
}

#[test]
fn organic_certification_after_two_seasons() {
    let mut s = session(500_000);
    let id = ParcelId::new("north");
    s.start_organic_conversion(&id).unwrap();

    let first = s.advance_season().unwrap();
    assert!(!s.farm().parcel(&id).unwrap().organic_certified);
    assert_eq!(first.report.certification_costs, Decimal::from(1_500));

    let second = s.advance_season().unwrap();
    assert!(s.farm().parcel(&id).unwrap().organic_certified);
    assert_eq!(second.report.certification_costs, Decimal::from(1_500));
    assert_eq!(s.market().organic_premium, 1.4);

    // certified retail sales now carry the premium tier
    while s.farm().season != Season::Summer {
        s.advance_season().unwrap();
    }
    s.harvest(&id).unwrap();
    let sale = s.sell(SaleChannel::Retail, 100).unwrap();
    assert_eq!(sale.quote.organic_premium_mod, 1.4);
    assert_eq!(sale.sales[0].tier, QualityTier::Premium);
}

#[test]
fn risky_farm_is_warned_not_blocked() {
    let mut s = session(10_000);
    assert!(s.stability().is_risky);
    assert!(matches!(
        s.purchase_infrastructure(InfrastructureKind::Shaker),
        Err(ActionError::InsufficientCash { .. })
    ));
    let out = s.advance_season().unwrap();
    assert!(out.stability.is_risky);
    assert!(s.farm().cash < Decimal::ZERO);
    assert_eq!(s.farm().cash, Decimal::from(10_000) - out.settled_costs);
}

#[test]
fn farm_snapshot_survives_json() {
    let mut s = session(500_000);
    s.advance_season().unwrap();
    s.harvest(&ParcelId::new("north")).unwrap();
    let json = serde_json::to_string(s.farm()).unwrap();
    let restored: Farm = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.cash, s.farm().cash);
    assert_eq!(restored.inventory, s.farm().inventory);
    assert_eq!(restored.season, s.farm().season);
    assert_eq!(restored.parcels.len(), 2);
    let resumed = FarmSession::new(restored, GameRules::default()).unwrap();
    assert_eq!(resumed.market(), s.market());
}

#[derive(Clone, Debug)]
enum Action {
    Water(usize),
    Fertilize(usize),
    Harvest(usize),
    Sell(bool, u64),
    Buy(usize),
    Convert(usize),
    Advance,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0usize..2).prop_map(Action::Water),
        (0usize..2).prop_map(Action::Fertilize),
        (0usize..2).prop_map(Action::Harvest),
        (any::<bool>(), 1u64..80_000).prop_map(|(r, kg)| Action::Sell(r, kg)),
        (0usize..3).prop_map(Action::Buy),
        (0usize..2).prop_map(Action::Convert),
        Just(Action::Advance),
        Just(Action::Advance),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cash_moves_only_through_reports(actions in prop::collection::vec(action(), 0..60)) {
        let ids = [ParcelId::new("north"), ParcelId::new("south")];
        let kinds = [
            InfrastructureKind::Tractor,
            InfrastructureKind::Sprayer,
            InfrastructureKind::ColdStorage,
        ];
        let mut s = session(300_000);
        for a in actions {
            let _ = match a {
                Action::Water(i) => s.water_parcel(&ids[i]).map(|_| ()),
                Action::Fertilize(i) => s.fertilize_parcel(&ids[i]).map(|_| ()),
                Action::Harvest(i) => s.harvest(&ids[i]).map(|_| ()),
                Action::Sell(retail, kg) => {
                    let channel = if retail { SaleChannel::Retail } else { SaleChannel::Wholesale };
                    s.sell(channel, kg).map(|_| ())
                }
                Action::Buy(k) => s.purchase_infrastructure(kinds[k]).map(|_| ()),
                Action::Convert(i) => s.start_organic_conversion(&ids[i]),
                Action::Advance => s.advance_season().map(|_| ()),
            };
        }
        s.advance_season().unwrap();

        let reports = s.stats().season_reports();
        let net: Decimal = reports.iter().map(|r| r.net_profit).sum();
        prop_assert_eq!(s.farm().cash, Decimal::from(300_000) + net);
        for y in s.stats().yearly_reports() {
            let seasons: Decimal = y.seasons.iter().map(|r| r.total_costs).sum();
            prop_assert_eq!(y.total_costs, seasons);
        }
        prop_assert_eq!(s.farm().season_number as usize, reports.len());
    }
}
