use crate::model::Composer;
use crate::model::ComposerId;
use crate::model::Composition;
use crate::model::Concerto;
use crate::model::Instrument;
use crate::model::InstrumentType;
use crate::model::Location;
use crate::model::Period;
use crate::model::Piece;
use crate::model::Song;
use chrono::NaiveDate;
use triomphe::Arc;

const LIEBESFRUHLING: &str = "\
How often has spring returned
For the dead and desolate world!
How often was spring greeted on all sides
By happy songs in wood and field!

How often has spring returned!
But no spring burgeoned for me:
The songs of my heart are silent,
For spring can only be brought by you.";

pub(super) fn composers() -> Vec<Composer> {
    let organ = Arc::new(Instrument::new("Organ", InstrumentType::Keyboard));
    let piano = Arc::new(Instrument::new("Piano", InstrumentType::Keyboard));
    let harpsichord = Arc::new(Instrument::new("Harpsichord", InstrumentType::Keyboard));
    let clarinet = Arc::new(Instrument::new("Clarinet", InstrumentType::Woodwind));
    vec![
        composer(
            1,
            ("Johann", "Bach"),
            (1685, 3, 31),
            ("Leipzig", "Germany"),
            &organ,
            Period::Baroque,
            vec![
                piece("Toccata and Fugue in D minor", Some("Dm")),
                piece("Mass in B minor", Some("Bm")),
                piece("Cello Suite No. 1", Some("G")),
            ],
        ),
        composer(
            2,
            ("Ludwig", "Beethoven"),
            (1770, 3, 26),
            ("Vienna", "Austria"),
            &piano,
            Period::Classical,
            vec![
                piece("Symphony No. 5", Some("Cm")),
                piece("Moonlight Sonata", Some("C#m")),
            ],
        ),
        composer(
            3,
            ("Wolfgang", "Mozart"),
            (1756, 1, 27),
            ("Vienna", "Austria"),
            &harpsichord,
            Period::Classical,
            vec![
                piece("Eine kleine Nachtmusik", Some("G")),
                piece("Requiem", Some("Dm")),
                concerto("Clarinet Concerto in A Major", "A", &clarinet),
            ],
        ),
        composer(
            4,
            ("Clara", "Schumann"),
            (1819, 9, 13),
            ("Frankfurt", "Germany"),
            &piano,
            Period::Romantic,
            vec![
                concerto("Piano Concerto in A minor", "Am", &piano),
                Composition::Song(Song {
                    title: "Liebesfrühling".into(),
                    key: Some("C#".into()),
                    lyrics: LIEBESFRUHLING.into(),
                }),
            ],
        ),
        composer(
            5,
            ("Giovanni", "Palestrina"),
            (1594, 2, 2),
            ("Rome", "Italy"),
            &organ,
            Period::Renaissance,
            vec![piece("Missa Papae Marcelli", Some("C"))],
        ),
        composer(
            6,
            ("Sergei", "Rachmaninoff"),
            (1873, 4, 1),
            ("Moscow", "Russia"),
            &piano,
            Period::Romantic,
            vec![
                concerto("Piano Concerto No. 2", "Cm", &piano),
                piece("Symphony No. 2", Some("Em")),
            ],
        ),
        composer(
            7,
            ("Maurice", "Ravel"),
            (1875, 3, 7),
            ("Paris", "France"),
            &piano,
            Period::Modern,
            vec![piece("Bolero", Some("C")), piece("La Valse", Some("D"))],
        ),
        composer(
            8,
            ("John", "Cage"),
            (1912, 9, 5),
            ("New York", "America"),
            &piano,
            Period::PostModern,
            vec![piece("4:33", None), piece("Organ² / ASLSP", Some("Bb"))],
        ),
    ]
}

fn composer(
    id: ComposerId,
    (first_name, last_name): (&str, &str),
    (year, month, day): (i32, u32, u32),
    (city, country): (&str, &str),
    primary_instrument: &Arc<Instrument>,
    period: Period,
    compositions: Vec<Composition>,
) -> Composer {
    Composer {
        id,
        first_name: Some(first_name.into()),
        last_name: Some(last_name.into()),
        date_of_birth: NaiveDate::from_ymd_opt(year, month, day),
        location: Some(Arc::new(Location::new(city, country))),
        primary_instrument: Some(primary_instrument.clone()),
        period: Some(period),
        compositions,
    }
}

fn piece(title: &str, key: Option<&str>) -> Composition {
    Composition::Piece(Piece {
        title: title.into(),
        key: key.map(Into::into),
    })
}

fn concerto(title: &str, key: &str, solo_instrument: &Arc<Instrument>) -> Composition {
    Composition::Concerto(Concerto {
        title: title.into(),
        key: Some(key.into()),
        solo_instrument: solo_instrument.clone(),
    })
}
