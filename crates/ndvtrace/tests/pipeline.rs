use approx::assert_relative_eq;

use ndvtrace::{
    bitgrid::BitGrid,
    geometry::{ring_ring_relation, Mpoly, Ring, RingRelation, Vertex},
    mask::{
        bitgrid_for_8bit_raster, read_raster_8bit, BandData, InMemoryRaster, MaskBuilder, NdvDef,
        ScanObservers,
    },
};

const WIDTH: usize = 12;
const HEIGHT: usize = 10;

// a 6x5 block of data at (2, 2) and a lonely pixel at (10, 8), zero elsewhere
fn block_band() -> Vec<u8> {
    let mut data = vec![0u8; WIDTH * HEIGHT];
    for y in 2..7 {
        for x in 2..8 {
            data[y * WIDTH + x] = 40 + (x + y) as u8;
        }
    }
    data[8 * WIDTH + 10] = 200;
    data
}

fn ring_of(pts: &[(f64, f64)]) -> Ring {
    Ring::new(pts.iter().map(|&p| Vertex::from(p)).collect())
}

#[test]
fn mask_erode_centroid() -> Result<(), Box<dyn std::error::Error>> {
    let mut raster = InMemoryRaster::new([WIDTH, HEIGHT].into(), (5, 3))
        .with_band(BandData::U8(block_band()))?
        .with_band(BandData::F64(vec![0.0; WIDTH * HEIGHT]))?;

    let ndv = NdvDef::from_values(&[0.0]);
    let mut fractions = Vec::new();
    let mut progress = |f: f64| fractions.push(f);
    let mut mask: BitGrid = MaskBuilder::new(&ndv)
        .with_progress(&mut progress)
        .build(&mut raster, &[1, 2])?;

    assert_eq!(mask.count_ones(), 31);
    assert!(mask.get(10, 8));
    assert_eq!(fractions.last(), Some(&1.0));

    // the lonely pixel goes, the block stays whole
    assert_eq!(mask.erode(), 1);
    assert_eq!(mask.count_ones(), 30);

    let centroid = mask.centroid()?;
    assert_relative_eq!(centroid.x, 4.5);
    assert_relative_eq!(centroid.y, 4.0);
    Ok(())
}

#[test]
fn eight_bit_read_matches_equality_mask() -> Result<(), Box<dyn std::error::Error>> {
    let mut raster =
        InMemoryRaster::new([WIDTH, HEIGHT].into(), (4, 4)).with_band(BandData::U8(block_band()))?;

    let (pixels, histogram) = read_raster_8bit(&mut raster, 1, &mut ScanObservers::default())?;
    assert_eq!(histogram.count(0), WIDTH * HEIGHT - 31);
    assert!(histogram.contains(200));

    // only the lonely pixel has value 200
    let lonely = bitgrid_for_8bit_raster([WIDTH, HEIGHT].into(), &pixels, 200)?;
    assert_eq!(lonely.iter_set().collect::<Vec<_>>(), vec![(10, 8)]);

    // valid data in 1..=255, intersected with itself
    let valid = NdvDef::new(vec!["1..255".parse()?], true);
    let mask = MaskBuilder::new(&valid).build(&mut raster, &[1, 1])?;
    let zero = bitgrid_for_8bit_raster([WIDTH, HEIGHT].into(), &pixels, 0)?;
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            assert_eq!(mask.get(x, y), !zero.get(x, y));
        }
    }
    Ok(())
}

#[test]
fn outline_with_hole() -> Result<(), Box<dyn std::error::Error>> {
    let outer = ring_of(&[(2.0, 2.0), (8.0, 2.0), (8.0, 7.0), (2.0, 7.0)]);
    let mut hole = ring_of(&[(4.0, 3.0), (6.0, 3.0), (6.0, 5.0), (4.0, 5.0)]);
    hole.is_hole = true;
    let island = ring_of(&[(10.0, 8.0), (11.0, 8.0), (11.0, 9.0), (10.0, 9.0)]);

    assert_eq!(ring_ring_relation(&outer, &hole), RingRelation::Contains);
    assert_eq!(ring_ring_relation(&hole, &outer), RingRelation::ContainedBy);
    assert_eq!(ring_ring_relation(&outer, &island), RingRelation::Disjoint);

    let mut mpoly = Mpoly::new(vec![island, outer, hole]);
    mpoly.assign_hole_parents()?;
    mpoly.validate()?;
    assert_eq!(mpoly.rings[2].parent_id, Some(1));
    assert_relative_eq!(mpoly.rings[1].area()? - mpoly.rings[2].area()?, 26.0);

    assert!(mpoly.contains(Vertex::new(3.0, 3.0)));
    assert!(!mpoly.contains(Vertex::new(5.0, 4.0)));
    assert!(mpoly.contains(Vertex::new(10.5, 8.5)));

    let json = serde_json::to_string(&mpoly)?;
    let back: Mpoly = serde_json::from_str(&json)?;
    assert_eq!(back, mpoly);

    // dropping the island shifts the hole onto the new outer index
    let removed = mpoly.delete_ring(0)?;
    assert_eq!(removed.len(), 1);
    assert_eq!(mpoly.rings[1].parent_id, Some(0));

    let polygons = mpoly.split_into_polygons();
    assert_eq!(polygons.len(), 1);
    assert_eq!(polygons[0].rings.len(), 2);
    Ok(())
}
