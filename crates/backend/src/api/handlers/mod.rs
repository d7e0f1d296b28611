pub mod d100_candy_sales;
