use fftw_age::{Direction, Error, Rigour, Transform};
use serde::Deserialize;

#[derive(Deserialize)]
struct Named {
    planner: String,
    direction: String,
    dims: [usize; 3],
    name: String,
}

#[derive(Deserialize)]
struct Rejected {
    planner: String,
    direction: String,
    dims: [usize; 3],
    error: String,
}

fn transform(planner: &str, direction: &str, dims: [usize; 3]) -> Result<Transform, Error> {
    let rigour: Rigour = planner.parse()?;
    let direction: Direction = direction.parse()?;
    let transform = Transform::in_place_c2c(direction, rigour, dims);
    transform.validate()?;
    Ok(transform)
}

#[test]
fn wisdom_file_names() {
    let cases: Vec<Named> = serde_json::from_str(std::include_str!("cases/names.json")).unwrap();
    for case in cases {
        let t = transform(&case.planner, &case.direction, case.dims).unwrap();
        assert_eq!(fftw_age::wisdom_file_name(&t), case.name);
        assert_eq!(fftw_age::parse_wisdom_file_name(&case.name).unwrap(), t);
        assert_eq!(
            fftw_age::wisdom_path("out", &t),
            std::path::Path::new("out").join(&case.name)
        );
    }
}

#[test]
fn rejected_transforms() {
    let cases: Vec<Rejected> =
        serde_json::from_str(std::include_str!("cases/rejected.json")).unwrap();
    for case in cases {
        let err = transform(&case.planner, &case.direction, case.dims).unwrap_err();
        let kind = match err {
            Error::Unsupported { .. } => "unsupported",
            Error::InvalidCode { .. } => "invalid-code",
            Error::InvalidDimensions { .. } => "dimensions",
            ref other => panic!("unexpected error {:?}", other),
        };
        assert_eq!(
            kind, case.error,
            "{} {} {:?}: {}",
            case.planner, case.direction, case.dims, err
        );
    }
}
