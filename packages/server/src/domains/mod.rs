pub mod outfits;
