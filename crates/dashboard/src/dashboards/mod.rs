pub mod d400_district_performance;
