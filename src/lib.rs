/*
 *  lib.rs
 *
 *  NetWorS - worth watching
 *	(c) 2020-26 Stuart Hunter
 *
 *	Net worth dashboard for a 480x320 RGB565 panel: a fetch worker polls
 *	the portfolio feed and swaps whole snapshots into a guarded store; the
 *	render loop reads copies and rotates the page layouts.
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

pub mod bigtext;
pub mod color;
pub mod config;
pub mod constants;
pub mod draw;
pub mod momentum;
pub mod pacer;
pub mod pages;
pub mod panel;
pub mod portfolio;
pub mod snapshot;
pub mod touch;
pub mod vframebuf;
