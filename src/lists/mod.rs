pub mod straight_list;
