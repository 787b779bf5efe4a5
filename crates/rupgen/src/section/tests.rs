use super::*;
use crate::error::SetupError;

fn sect(id: usize, parent: Option<u32>) -> Section {
    Section::new(id, parent)
}

#[test]
fn model_rejects_misordered_ids() {
    let err = SectionModel::new(vec![sect(0, Some(1)), sect(2, Some(1)), sect(1, Some(1))])
        .unwrap_err();
    assert_eq!(
        err,
        SetupError::SectionIdMismatch {
            index: 1,
            id: SectionId(2)
        }
    );
    assert!(SectionModel::new(vec![sect(0, None), sect(1, Some(3))]).is_ok());
}

#[test]
fn pair_is_order_independent() {
    let a = SectionPair::new(SectionId(7), SectionId(3));
    let b = SectionPair::new(SectionId(3), SectionId(7));
    assert_eq!(a, b);
    assert_eq!(a.lo(), SectionId(3));
    assert_eq!(a.hi(), SectionId(7));

    let mut d = DistanceMap::new();
    d.insert(SectionId(7), SectionId(3), 1.5);
    assert_eq!(d.get(SectionId(3), SectionId(7)), Some(1.5));
    assert_eq!(d.get(SectionId(7), SectionId(3)), Some(1.5));
    assert_eq!(d.get(SectionId(7), SectionId(4)), None);
}

#[test]
fn parentless_sections_never_share_a_parent() {
    let a = sect(0, None);
    let b = sect(1, None);
    let c = sect(2, Some(4));
    let d = sect(3, Some(4));
    assert!(!a.shares_parent(&b));
    assert!(!a.shares_parent(&c));
    assert!(c.shares_parent(&d));

    let model = SectionModel::new(vec![a, b, c, d]).unwrap();
    assert!(model.is_junction(SectionId(0), SectionId(1)));
    assert!(!model.is_junction(SectionId(2), SectionId(3)));
}

#[test]
fn distance_validation_catches_bad_entries() {
    let model = SectionModel::new((0..3).map(|i| sect(i, Some(0))).collect()).unwrap();

    let unknown: DistanceMap = [(SectionId(0), SectionId(5), 1.0)].into_iter().collect();
    assert!(matches!(
        unknown.validate(&model),
        Err(SetupError::UnknownSection { id: SectionId(5), .. })
    ));

    let selfpair: DistanceMap = [(SectionId(1), SectionId(1), 1.0)].into_iter().collect();
    assert!(matches!(
        selfpair.validate(&model),
        Err(SetupError::SelfPair { .. })
    ));

    let negative: DistanceMap = [(SectionId(0), SectionId(1), -0.5)].into_iter().collect();
    assert!(matches!(
        negative.validate(&model),
        Err(SetupError::InvalidDistance { .. })
    ));

    let nan: DistanceMap = [(SectionId(0), SectionId(1), f64::NAN)].into_iter().collect();
    assert!(nan.validate(&model).is_err());

    let ok: DistanceMap = [(SectionId(0), SectionId(2), 0.0)].into_iter().collect();
    assert!(ok.validate(&model).is_ok());
}

#[test]
fn inputs_validate_all_maps() {
    let model = SectionModel::new((0..2).map(|i| sect(i, Some(0))).collect()).unwrap();
    let inputs = FaultInputs::new(model, DistanceMap::new())
        .with_azimuths([(SectionId(0), SectionId(9), 10.0)].into_iter().collect());
    assert!(matches!(
        inputs.validate(),
        Err(SetupError::UnknownSection { context: "azimuth map", .. })
    ));
}

#[test]
fn azimuths_are_directed() {
    let mut az = AzimuthMap::new();
    az.insert(SectionId(0), SectionId(1), 45.0);
    assert_eq!(az.get(SectionId(0), SectionId(1)), Some(45.0));
    assert_eq!(az.get(SectionId(1), SectionId(0)), None);
    assert_eq!(az.of_jump(Jump::new(SectionId(0), SectionId(1))), Some(45.0));
}
